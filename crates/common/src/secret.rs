//! Secret wrapper for registry credentials
//!
//! Registry passwords and access tokens pass through several layers
//! (credential lookup, Basic encoding, the OAuth exchange) and must never
//! reach logs on the way. The wrapper redacts Debug/Display and wipes the
//! value on drop.

use std::fmt;
use zeroize::Zeroize;

/// Sensitive value - redacted in Debug/Display/logs, zeroized on drop.
///
/// An empty inner value is legal: anonymous registry accounts carry an
/// empty-string secret, and `is_empty` lets callers observe that without
/// exposing the value.
pub struct Secret<T: Zeroize>(T);

impl<T: Zeroize> Secret<T> {
    /// Create a new secret value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the inner value (use sparingly)
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl Secret<String> {
    /// Whether the wrapped string is empty, without exposing it.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacts_debug() {
        let secret = Secret::new(String::from("registry-pa55word"));
        let debug = format!("{:?}", secret);
        assert_eq!(debug, "[REDACTED]");
        assert!(!debug.contains("registry-pa55word"));
    }

    #[test]
    fn secret_redacts_display() {
        let secret = Secret::new(String::from("registry-pa55word"));
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn secret_exposes_value() {
        let secret = Secret::new(String::from("registry-pa55word"));
        assert_eq!(secret.expose(), "registry-pa55word");
    }

    #[test]
    fn empty_secret_is_observable() {
        let secret: Secret<String> = String::new().into();
        assert!(secret.is_empty());
        assert!(!Secret::new(String::from("x")).is_empty());
    }
}
