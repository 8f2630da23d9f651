//! Validated hook names.

use crate::error::HookError;
use core::borrow::Borrow;
use core::fmt;
use core::str::FromStr;

/// Name of a hook.
///
/// Hook names are atomic symbolic tokens: an ASCII letter or underscore,
/// followed by ASCII alphanumerics or underscores, with at most one trailing
/// `?` or `!` (`on_signal`, `we_get_signal!`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookName(String);

impl HookName {
    /// Validates `name` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidHookName`] if `name` is not a symbolic token.
    pub fn new(name: impl Into<String>) -> Result<Self, HookError> {
        let name = name.into();
        if is_symbolic(&name) {
            Ok(Self(name))
        } else {
            Err(HookError::InvalidHookName(name))
        }
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_symbolic(name: &str) -> bool {
    let body = name
        .strip_suffix('?')
        .or_else(|| name.strip_suffix('!'))
        .unwrap_or(name);

    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HookName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for HookName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for HookName {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for HookName {
    type Error = HookError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for HookName {
    type Error = HookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&HookName> for HookName {
    type Error = HookError;

    fn try_from(value: &HookName) -> Result<Self, Self::Error> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        for name in ["foo", "on_signal", "_private", "we_get_signal!", "ready?", "a1"] {
            assert!(HookName::new(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_non_symbols() {
        for name in ["", "1foo", "foo bar", "foo-bar", "?", "foo!!", "foo?!", "föo"] {
            let err = HookName::new(name).expect_err("name should be rejected");
            assert!(matches!(err, HookError::InvalidHookName(ref n) if n == name));
        }
    }

    #[test]
    fn displays_raw_name() {
        let name: HookName = "on_signal".parse().unwrap();
        assert_eq!(name.to_string(), "on_signal");
        assert_eq!(name.as_str(), "on_signal");
    }
}
