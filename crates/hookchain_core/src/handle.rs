//! Callback handles.

use core::fmt;

/// Identifier used to address a callback within its [`CallbackSet`](crate::CallbackSet).
///
/// A handle is either an explicit name chosen at registration or the
/// automatically assigned insertion index. When used as a lookup key,
/// [`Handle::Index`] matches the callback whose `index` equals the value,
/// and [`Handle::Name`] matches the callback registered under that name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Explicit name.
    Name(String),
    /// Auto-assigned insertion index.
    Index(usize),
}

impl Handle {
    /// Returns the name if this is an explicit handle.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    /// Returns the index if this is an auto-assigned handle.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<&String> for Handle {
    fn from(value: &String) -> Self {
        Self::Name(value.clone())
    }
}

impl From<usize> for Handle {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<&Handle> for Handle {
    fn from(value: &Handle) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for Handle {
    fn eq(&self, other: &str) -> bool {
        self.as_name() == Some(other)
    }
}

impl PartialEq<&str> for Handle {
    fn eq(&self, other: &&str) -> bool {
        self.as_name() == Some(*other)
    }
}

impl PartialEq<usize> for Handle {
    fn eq(&self, other: &usize) -> bool {
        self.as_index() == Some(*other)
    }
}
