use thiserror::Error;

/// Failures surfaced by registry operations.
///
/// Every variant is returned synchronously to the caller; the registry never
/// retries or recovers on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The caller is not currently registered.
    #[error("caller {caller} has no permission to access the registry")]
    Permission { caller: String },

    /// The key cannot be hashed (it is, or contains, a list).
    #[error("key must be hashable, but got {kind}")]
    InvalidKey { kind: &'static str },

    /// Nothing is stored under the key.
    #[error("key not found in registry: {key}")]
    KeyNotFound { key: String },

    /// Registering or unregistering a caller failed internally.
    #[error("failed to update registration of {caller}: {reason}")]
    Registration { caller: String, reason: String },

    /// A value exists under the key but it is not of the requested type.
    #[error("type mismatch in registry for key {key}: expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// The registry lock was poisoned by a panic in another thread.
    #[error("failed to acquire registry lock")]
    RegistryLock,
}
