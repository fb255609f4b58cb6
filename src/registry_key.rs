//! Opaque keys for registry entries.
//!
//! Keys are dynamic values. Scalars and tuples of hashable keys can be stored;
//! lists are mutable sequences and are rejected as unhashable, wherever they
//! appear inside the key.

use std::fmt;

use crate::RegistryError;

/// A key under which a value is stored.
///
/// # Examples
///
/// ```rust
/// use guarded_registry::RegistryKey;
///
/// assert!(RegistryKey::from("job").ensure_hashable().is_ok());
/// assert!(RegistryKey::from(("job", 7)).ensure_hashable().is_ok());
/// assert!(RegistryKey::list([1, 2]).ensure_hashable().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Str(String),
    /// Any integer up to 64 bits wide, signed or not, and `i128`.
    /// `u128` has no conversion because it does not fit.
    Int(i128),
    Bool(bool),
    Bytes(Vec<u8>),
    /// Fixed sequence; hashable when every element is.
    Tuple(Vec<RegistryKey>),
    /// Mutable sequence; never hashable.
    List(Vec<RegistryKey>),
}

impl RegistryKey {
    /// Builds a tuple key. It is hashable only if every element is.
    ///
    /// ```rust
    /// use guarded_registry::RegistryKey;
    ///
    /// assert_eq!(RegistryKey::tuple(["job", "retry"]).to_string(), "(\"job\", \"retry\")");
    /// ```
    pub fn tuple<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<RegistryKey>,
    {
        RegistryKey::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Builds a list key. Lists are never hashable, so the registry rejects it.
    pub fn list<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<RegistryKey>,
    {
        RegistryKey::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the key's kind, as reported in errors.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryKey::Str(_) => "str",
            RegistryKey::Int(_) => "int",
            RegistryKey::Bool(_) => "bool",
            RegistryKey::Bytes(_) => "bytes",
            RegistryKey::Tuple(_) => "tuple",
            RegistryKey::List(_) => "list",
        }
    }

    /// Fails with [`RegistryError::InvalidKey`] naming the first unhashable
    /// component found.
    pub fn ensure_hashable(&self) -> Result<(), RegistryError> {
        match self {
            RegistryKey::List(_) => Err(RegistryError::InvalidKey { kind: self.kind() }),
            RegistryKey::Tuple(items) => items.iter().try_for_each(RegistryKey::ensure_hashable),
            _ => Ok(()),
        }
    }

    /// Infallible form of [`ensure_hashable`](RegistryKey::ensure_hashable).
    pub fn is_hashable(&self) -> bool {
        self.ensure_hashable().is_ok()
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[RegistryKey]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKey::Str(s) => write!(f, "{s:?}"),
            RegistryKey::Int(i) => write!(f, "{i}"),
            RegistryKey::Bool(b) => write!(f, "{b}"),
            RegistryKey::Bytes(bytes) => write!(f, "b{:?}", String::from_utf8_lossy(bytes)),
            RegistryKey::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            RegistryKey::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for RegistryKey {
    fn from(value: &str) -> Self {
        RegistryKey::Str(value.to_string())
    }
}

impl From<String> for RegistryKey {
    fn from(value: String) -> Self {
        RegistryKey::Str(value)
    }
}

impl From<&String> for RegistryKey {
    fn from(value: &String) -> Self {
        RegistryKey::Str(value.clone())
    }
}

impl From<bool> for RegistryKey {
    fn from(value: bool) -> Self {
        RegistryKey::Bool(value)
    }
}

impl From<&[u8]> for RegistryKey {
    fn from(value: &[u8]) -> Self {
        RegistryKey::Bytes(value.to_vec())
    }
}

macro_rules! int_key {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RegistryKey {
                fn from(value: $t) -> Self {
                    RegistryKey::Int(i128::from(value))
                }
            }
        )*
    };
}

int_key!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

// Pointer-sized integers are at most 64 bits on every supported target.
impl From<usize> for RegistryKey {
    fn from(value: usize) -> Self {
        RegistryKey::Int(value as i128)
    }
}

impl From<isize> for RegistryKey {
    fn from(value: isize) -> Self {
        RegistryKey::Int(value as i128)
    }
}

impl<A, B> From<(A, B)> for RegistryKey
where
    A: Into<RegistryKey>,
    B: Into<RegistryKey>,
{
    fn from((a, b): (A, B)) -> Self {
        RegistryKey::Tuple(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for RegistryKey
where
    A: Into<RegistryKey>,
    B: Into<RegistryKey>,
    C: Into<RegistryKey>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        RegistryKey::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_are_hashable() {
        assert!(RegistryKey::from("job").is_hashable());
        assert!(RegistryKey::from(42i32).is_hashable());
        assert!(RegistryKey::from(true).is_hashable());
        assert!(RegistryKey::from(&b"raw"[..]).is_hashable());
    }

    #[test]
    fn test_list_is_rejected() {
        let key = RegistryKey::list([1, 2]);
        assert_eq!(
            key.ensure_hashable(),
            Err(RegistryError::InvalidKey { kind: "list" })
        );
    }

    #[test]
    fn test_tuple_hashability_follows_elements() {
        assert!(RegistryKey::from(("job", 1)).is_hashable());

        let nested = RegistryKey::tuple([RegistryKey::from("job"), RegistryKey::list([1])]);
        assert_eq!(
            nested.ensure_hashable(),
            Err(RegistryError::InvalidKey { kind: "list" })
        );
    }

    #[test]
    fn test_integer_widths_share_one_key() {
        assert_eq!(RegistryKey::from(7u8), RegistryKey::from(7i64));
        assert_eq!(RegistryKey::from(7u32), RegistryKey::Int(7));
    }

    #[test]
    fn test_wide_and_index_integers() {
        assert_eq!(RegistryKey::from(7usize), RegistryKey::from(7i32));
        assert_eq!(RegistryKey::from(-7isize), RegistryKey::Int(-7));
        assert_eq!(RegistryKey::from(7i128), RegistryKey::from(7u64));

        let max = RegistryKey::from(u64::MAX);
        assert_eq!(max, RegistryKey::Int(u64::MAX as i128));
        assert_ne!(max, RegistryKey::from(-1i64));
        assert_eq!(max.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_string_forms_are_equal() {
        let owned = String::from("job");
        assert_eq!(RegistryKey::from("job"), RegistryKey::from(owned.clone()));
        assert_eq!(RegistryKey::from("job"), RegistryKey::from(&owned));
    }

    #[test]
    fn test_display() {
        assert_eq!(RegistryKey::from("job").to_string(), "\"job\"");
        assert_eq!(RegistryKey::from(("job", 3)).to_string(), "(\"job\", 3)");
        assert_eq!(RegistryKey::tuple([1]).to_string(), "(1,)");
        assert_eq!(RegistryKey::list([1, 2]).to_string(), "[1, 2]");
        assert_eq!(RegistryKey::from(&b"ab"[..]).to_string(), "b\"ab\"");
    }

    #[test]
    fn test_kind() {
        assert_eq!(RegistryKey::from(false).kind(), "bool");
        assert_eq!(RegistryKey::list(Vec::<i32>::new()).kind(), "list");
    }
}
