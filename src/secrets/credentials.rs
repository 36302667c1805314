//! Credential mapping passed to tools.

use std::collections::HashMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::tools::ToolError;

/// Credential values for a single provider, keyed by field name.
#[derive(Clone, Default)]
pub struct Credentials {
    values: HashMap<String, SecretString>,
}

impl Credentials {
    /// Create an empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a credential value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(key.into(), SecretString::from(value.into()));
    }

    /// Get a credential value. Empty strings count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.expose_secret())
            .filter(|v| !v.is_empty())
    }

    /// Get a credential value or fail with `MissingCredential`.
    pub fn require(&self, key: &str) -> Result<&str, ToolError> {
        self.get(key)
            .ok_or_else(|| ToolError::MissingCredential(format!("Please input {}", key)))
    }

    /// Names of the credential fields present (values are never exposed).
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.keys())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Credentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut creds = Self::new();
        for (k, v) in iter {
            creds.insert(k, v);
        }
        creds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_absent() {
        let creds = Credentials::new().with("appid", "");
        assert!(creds.get("appid").is_none());
        assert!(matches!(
            creds.require("appid"),
            Err(ToolError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_require_present() {
        let creds = Credentials::new().with("appid", "XYZ-123");
        assert_eq!(creds.require("appid").unwrap(), "XYZ-123");
    }

    #[test]
    fn test_debug_redacts_values() {
        let creds: Credentials = [("appid", "super-secret"), ("api_key", "k")]
            .into_iter()
            .collect();
        let shown = format!("{:?}", creds);
        assert!(shown.contains("appid"));
        assert!(!shown.contains("super-secret"));
    }
}
