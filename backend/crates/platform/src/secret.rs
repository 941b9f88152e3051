//! Secret strings
//!
//! Holds credentials loaded from the environment (bot token, storage service
//! key). The value is wiped on drop and never shows up in `Debug` output.

use std::fmt;
use zeroize::Zeroize;

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the plaintext. Keep the borrow short and never log it.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::new("123:ABC");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("123:ABC"));
        assert_eq!(secret.expose(), "123:ABC");
    }

    #[test]
    fn test_empty() {
        assert!(SecretString::new("").is_empty());
        assert!(!SecretString::from("x".to_string()).is_empty());
    }
}
