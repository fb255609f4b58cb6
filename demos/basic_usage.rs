//! Two components sharing configuration through the guarded registry.
//!
//! Run with `RUST_LOG=guarded_registry=debug` to see the registry's log events.

use guarded_registry::{RegistryAccess, RegistryError, RegistryKey};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct DatabaseConfig {
    url: String,
    max_connections: u32,
}

struct Bootstrap;
impl RegistryAccess for Bootstrap {}

struct ReportJob;
impl RegistryAccess for ReportJob {}

fn main() -> Result<(), RegistryError> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "guarded_registry=debug".into());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .parse_lossy(filter),
        )
        .with_target(true)
        .init();

    let bootstrap = Bootstrap;
    bootstrap.setup()?;
    bootstrap.set_item(
        "database",
        DatabaseConfig {
            url: "postgres://localhost/reports".to_string(),
            max_connections: 8,
        },
    )?;
    bootstrap.teardown()?;

    // Not registered yet, so this is refused.
    if let Err(err) = ReportJob.get_item::<DatabaseConfig>("database") {
        info!(error = %err, "report job refused before setup");
    }

    {
        let _registration = ReportJob.acquire()?;
        let config: Arc<DatabaseConfig> = ReportJob.get_item("database")?;
        info!(url = %config.url, max = config.max_connections, "report job connected");

        if let Err(err) = ReportJob.set_item(RegistryKey::list(["a", "b"]), 1u8) {
            info!(error = %err, "list keys are rejected");
        }
    }

    info!(registered = ReportJob.is_setup()?, "report job finished");
    Ok(())
}
