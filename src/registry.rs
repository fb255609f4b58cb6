//! The process-wide, access-controlled key-value store.
//!
//! Only registered callers may read or write entries. Every operation runs under
//! a single exclusive lock, so the permission check and the map access it guards
//! happen atomically.
//!
//! # Examples
//!
//! ```
//! use guarded_registry::{CallerId, Registry, RegistryError};
//! use std::sync::Arc;
//!
//! struct Worker;
//! let worker = CallerId::of::<Worker>();
//! let registry = Registry::global();
//!
//! registry.register(&worker).unwrap();
//! registry.set(&worker, "job", 42i32).unwrap();
//!
//! let job: Arc<i32> = registry.get(&worker, "job").unwrap();
//! assert_eq!(*job, 42);
//!
//! registry.unregister(&worker).unwrap();
//! assert!(matches!(
//!     registry.get::<i32>(&worker, "job"),
//!     Err(RegistryError::Permission { .. })
//! ));
//! ```

use std::{
    any::Any,
    collections::{HashMap, HashSet},
    sync::{Arc, LazyLock, Mutex, MutexGuard},
};

use tracing::{debug, warn};

use crate::{CallerId, RegistryError, RegistryKey};

type StoredValue = Arc<dyn Any + Send + Sync>;

/// The one registry of this process, created on first access.
static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Returns the process-wide registry. Shorthand for [`Registry::global`].
pub fn registry() -> &'static Registry {
    Registry::global()
}

#[derive(Default)]
struct RegistryState {
    items: HashMap<RegistryKey, StoredValue>,
    registered_callers: HashSet<CallerId>,
}

/// Access-controlled key-value store.
///
/// There is exactly one instance per process, obtained with [`Registry::global`].
/// Caller identities are held as plain tokens; type identities are `'static`, so
/// membership never extends the lifetime of anything.
pub struct Registry {
    state: Mutex<RegistryState>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Registry {
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Returns the process-wide registry, constructing it on first call.
    ///
    /// Concurrent first calls observe the same instance.
    pub fn global() -> &'static Registry {
        &GLOBAL_REGISTRY
    }

    /// Grants `caller` access to the registry. Registering twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Registration`] if the registry lock is poisoned.
    pub fn register(&self, caller: &CallerId) -> Result<(), RegistryError> {
        let mut state = self.lock_for_registration(caller)?;
        if state.registered_callers.insert(caller.clone()) {
            debug!(%caller, "caller registered");
        }
        Ok(())
    }

    /// Revokes access for `caller`. Unregistering an absent caller is a no-op.
    ///
    /// Stored values are left in place.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Registration`] if the registry lock is poisoned.
    pub fn unregister(&self, caller: &CallerId) -> Result<(), RegistryError> {
        let mut state = self.lock_for_registration(caller)?;
        if state.registered_callers.remove(caller) {
            debug!(%caller, "caller unregistered");
        }
        Ok(())
    }

    /// Reports whether `caller` currently holds access.
    ///
    /// # Errors
    ///
    /// [`RegistryError::RegistryLock`] if the lock is poisoned.
    pub fn is_registered(&self, caller: &CallerId) -> Result<bool, RegistryError> {
        let state = self.lock()?;
        Ok(state.registered_callers.contains(caller))
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidKey`] if the key is not hashable
    /// - [`RegistryError::Permission`] if `caller` is not registered
    /// - [`RegistryError::RegistryLock`] if the lock is poisoned
    pub fn set<T: Send + Sync + 'static>(
        &self,
        caller: &CallerId,
        key: impl Into<RegistryKey>,
        value: T,
    ) -> Result<(), RegistryError> {
        self.set_arc(caller, key, Arc::new(value))
    }

    /// Stores an already shared value under `key` without re-wrapping it.
    ///
    /// Fails the same way as [`set`](Registry::set).
    pub fn set_arc<T: Send + Sync + 'static>(
        &self,
        caller: &CallerId,
        key: impl Into<RegistryKey>,
        value: Arc<T>,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        let previous = self.with_permission(caller, &key, |state| {
            debug!(%caller, %key, "item set");
            Ok(state.items.insert(key.clone(), value))
        })?;

        // The replaced value is dropped here, outside the lock.
        drop(previous);
        Ok(())
    }

    /// Retrieves the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidKey`] if the key is not hashable
    /// - [`RegistryError::Permission`] if `caller` is not registered
    /// - [`RegistryError::KeyNotFound`] if nothing is stored under `key`
    /// - [`RegistryError::TypeMismatch`] if the stored value is not a `T`
    /// - [`RegistryError::RegistryLock`] if the lock is poisoned
    pub fn get<T: Send + Sync + 'static>(
        &self,
        caller: &CallerId,
        key: impl Into<RegistryKey>,
    ) -> Result<Arc<T>, RegistryError> {
        let key = key.into();
        let stored = self.with_permission(caller, &key, |state| {
            let found = state.items.get(&key).cloned();
            debug!(%caller, %key, found = found.is_some(), "item get");
            found.ok_or_else(|| RegistryError::KeyNotFound {
                key: key.to_string(),
            })
        })?;

        stored
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Retrieves an owned clone of the value stored under `key`.
    ///
    /// Fails the same way as [`get`](Registry::get).
    pub fn get_cloned<T: Send + Sync + Clone + 'static>(
        &self,
        caller: &CallerId,
        key: impl Into<RegistryKey>,
    ) -> Result<T, RegistryError> {
        let arc = self.get::<T>(caller, key)?;
        Ok((*arc).clone())
    }

    /// Removes every item and every registered caller.
    ///
    /// This bypasses access control: no caller identity is checked, so any code
    /// holding the registry can wipe every value and revoke every grant. Intended
    /// for tests only. A poisoned lock is recovered and its poison cleared.
    #[doc(hidden)]
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        self.state.clear_poison();
        let items = std::mem::take(&mut state.items);
        state.registered_callers.clear();
        drop(state);
        drop(items);
    }

    // ---------------------------------------------------------------------------------------------
    // Guards
    // ---------------------------------------------------------------------------------------------

    fn lock(&self) -> Result<MutexGuard<'_, RegistryState>, RegistryError> {
        self.state.lock().map_err(|_| {
            warn!("registry lock poisoned");
            RegistryError::RegistryLock
        })
    }

    fn lock_for_registration(
        &self,
        caller: &CallerId,
    ) -> Result<MutexGuard<'_, RegistryState>, RegistryError> {
        self.state.lock().map_err(|_| {
            let err = RegistryError::Registration {
                caller: caller.to_string(),
                reason: "registry lock poisoned".to_string(),
            };
            warn!(%caller, error = %err, "registration failed");
            err
        })
    }

    /// Locks, validates the key, checks the caller's permission, then runs `op`.
    fn with_permission<R>(
        &self,
        caller: &CallerId,
        key: &RegistryKey,
        op: impl FnOnce(&mut RegistryState) -> Result<R, RegistryError>,
    ) -> Result<R, RegistryError> {
        let mut state = self.lock()?;
        key.ensure_hashable()?;

        if !state.registered_callers.contains(caller) {
            debug!(%caller, "permission denied");
            return Err(RegistryError::Permission {
                caller: caller.to_string(),
            });
        }

        op(&mut state)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
