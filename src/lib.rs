//! # Guarded Registry
//!
//! A process-wide, access-controlled key-value registry. Only callers that have
//! registered themselves may read or write entries.
//!
//! ## Quick Start
//!
//! ```rust
//! use guarded_registry::{RegistryAccess, RegistryError};
//!
//! struct Scheduler;
//! impl RegistryAccess for Scheduler {}
//!
//! let scheduler = Scheduler;
//! let _registration = scheduler.acquire()?;
//!
//! scheduler.set_item("interval", 30u64)?;
//! assert_eq!(scheduler.get_item_cloned::<u64>("interval")?, 30);
//! # Ok::<(), RegistryError>(())
//! ```
//!
//! ## Features
//!
//! - **Singleton**: one lazily created [`Registry`] per process
//! - **Permission gate**: `get`/`set` fail unless the caller is registered
//! - **Thread-safe**: every operation is serialized behind one lock
//! - **Scoped access**: [`Registration`] revokes access when it goes out of scope
//!
//! ## Logging
//!
//! Operations emit `tracing` events: failures at `warn`, routine traffic at
//! `debug`. Install any subscriber to see them.

mod caller_id;
mod registry;
mod registry_access;
mod registry_error;
mod registry_key;

pub use caller_id::CallerId;
pub use registry::{registry, Registry};
pub use registry_access::{Registration, RegistryAccess};
pub use registry_error::RegistryError;
pub use registry_key::RegistryKey;
