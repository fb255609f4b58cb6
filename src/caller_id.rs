//! Caller identities used as permission tokens.
//!
//! An identity is conventionally a Rust type: every instance of that type shares
//! one permission grant. Components that are not distinct types can use a named
//! token instead.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone)]
enum Token {
    Type {
        id: TypeId,
        name: &'static str,
    },
    Named(Cow<'static, str>),
}

/// Stable, hashable token identifying whoever accesses the registry.
///
/// Type tokens compare by `TypeId` only; the type name is kept for diagnostics.
///
/// # Examples
///
/// ```rust
/// use guarded_registry::CallerId;
///
/// struct Worker;
///
/// assert_eq!(CallerId::of::<Worker>(), CallerId::of::<Worker>());
/// assert_ne!(CallerId::of::<Worker>(), CallerId::named("worker"));
/// ```
#[derive(Clone)]
pub struct CallerId(Token);

impl CallerId {
    /// Identity of the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        CallerId(Token::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        })
    }

    /// Identity given by name rather than by type.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        CallerId(Token::Named(name.into()))
    }

    /// Human readable name of the identity.
    pub fn name(&self) -> &str {
        match &self.0 {
            Token::Type { name, .. } => name,
            Token::Named(name) => name,
        }
    }
}

impl PartialEq for CallerId {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Token::Type { id: a, .. }, Token::Type { id: b, .. }) => a == b,
            (Token::Named(a), Token::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CallerId {}

impl Hash for CallerId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Token::Type { id, .. } => {
                0u8.hash(state);
                id.hash(state);
            }
            Token::Named(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Debug for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Token::Type { name, .. } => f.debug_tuple("CallerId::Type").field(name).finish(),
            Token::Named(name) => f.debug_tuple("CallerId::Named").field(name).finish(),
        }
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
