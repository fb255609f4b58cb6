//! Reusable access to the shared registry.
//!
//! Any type adopts the capability with an empty impl:
//!
//! ```rust
//! use guarded_registry::{RegistryAccess, RegistryError};
//! use std::sync::Arc;
//!
//! struct Worker;
//! impl RegistryAccess for Worker {}
//!
//! let worker = Worker;
//! worker.setup()?;
//! worker.set_item("job", 42i32)?;
//! let job: Arc<i32> = worker.get_item("job")?;
//! assert_eq!(*job, 42);
//! worker.teardown()?;
//! # Ok::<(), RegistryError>(())
//! ```
//!
//! The permission grant belongs to the type, not the instance: every `Worker`
//! shares one grant, and tearing down through any of them revokes it for all.

use std::sync::Arc;

use tracing::warn;

use crate::{CallerId, Registry, RegistryError, RegistryKey};

/// Access Adapter: proxies registry calls using the implementor's identity.
///
/// All methods have default implementations. Override [`caller_id`] to act
/// under a named token instead of the type.
///
/// [`caller_id`]: RegistryAccess::caller_id
pub trait RegistryAccess: 'static {
    /// Identity presented to the registry. Defaults to the implementing type.
    fn caller_id(&self) -> CallerId {
        CallerId::of::<Self>()
    }

    /// Registers this caller with the process-wide registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Registration`] if the registry lock is poisoned.
    fn setup(&self) -> Result<(), RegistryError> {
        Registry::global().register(&self.caller_id())
    }

    /// Revokes this caller's access. A no-op if not registered.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Registration`] if the registry lock is poisoned.
    fn teardown(&self) -> Result<(), RegistryError> {
        Registry::global().unregister(&self.caller_id())
    }

    /// Reports whether this caller currently holds access.
    ///
    /// # Errors
    ///
    /// [`RegistryError::RegistryLock`] if the registry lock is poisoned.
    fn is_setup(&self) -> Result<bool, RegistryError> {
        Registry::global().is_registered(&self.caller_id())
    }

    /// Registers this caller and returns a guard that revokes access when dropped.
    ///
    /// Drop-driven revocation is best-effort: failures are logged, not raised.
    /// Call [`Registration::release`] where the outcome matters.
    fn acquire(&self) -> Result<Registration, RegistryError> {
        let caller = self.caller_id();
        Registry::global().register(&caller)?;
        Ok(Registration {
            caller,
            active: true,
        })
    }

    /// Stores `value` under `key` on behalf of this caller.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidKey`] if the key is not hashable
    /// - [`RegistryError::Permission`] if this caller is not set up
    /// - [`RegistryError::RegistryLock`] if the registry lock is poisoned
    fn set_item<T: Send + Sync + 'static>(
        &self,
        key: impl Into<RegistryKey>,
        value: T,
    ) -> Result<(), RegistryError> {
        Registry::global().set(&self.caller_id(), key, value)
    }

    /// Stores an already shared value under `key` without re-wrapping it.
    ///
    /// Fails the same way as [`set_item`](RegistryAccess::set_item).
    fn set_item_arc<T: Send + Sync + 'static>(
        &self,
        key: impl Into<RegistryKey>,
        value: Arc<T>,
    ) -> Result<(), RegistryError> {
        Registry::global().set_arc(&self.caller_id(), key, value)
    }

    /// Retrieves the value stored under `key` on behalf of this caller.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidKey`] if the key is not hashable
    /// - [`RegistryError::Permission`] if this caller is not set up
    /// - [`RegistryError::KeyNotFound`] if nothing is stored under `key`
    /// - [`RegistryError::TypeMismatch`] if the stored value is not a `T`
    /// - [`RegistryError::RegistryLock`] if the registry lock is poisoned
    fn get_item<T: Send + Sync + 'static>(
        &self,
        key: impl Into<RegistryKey>,
    ) -> Result<Arc<T>, RegistryError> {
        Registry::global().get(&self.caller_id(), key)
    }

    /// Retrieves an owned clone of the value stored under `key`.
    ///
    /// Fails the same way as [`get_item`](RegistryAccess::get_item).
    fn get_item_cloned<T: Send + Sync + Clone + 'static>(
        &self,
        key: impl Into<RegistryKey>,
    ) -> Result<T, RegistryError> {
        Registry::global().get_cloned(&self.caller_id(), key)
    }
}

/// Scoped registration returned by [`RegistryAccess::acquire`].
///
/// Unregisters its caller when dropped.
#[must_use = "dropping the registration immediately revokes access"]
#[derive(Debug)]
pub struct Registration {
    caller: CallerId,
    active: bool,
}

impl Registration {
    /// Identity this guard keeps registered.
    pub fn caller_id(&self) -> &CallerId {
        &self.caller
    }

    /// Revokes access now and reports the outcome.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Registration`] if the registry lock is poisoned.
    pub fn release(mut self) -> Result<(), RegistryError> {
        self.active = false;
        Registry::global().unregister(&self.caller)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(err) = Registry::global().unregister(&self.caller) {
            warn!(caller = %self.caller, error = %err, "failed to release registration");
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
