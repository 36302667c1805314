use std::time::Duration;

use secrecy::SecretString;

use crate::config::helpers::{optional_env, parse_optional_env, parse_positive_secs};
use crate::error::ConfigError;

/// Default Wolfram Alpha v2 query endpoint.
pub const DEFAULT_WOLFRAM_BASE_URL: &str = "https://api.wolframalpha.com/v2/query";

/// Wolfram Alpha tool configuration.
#[derive(Debug, Clone)]
pub struct WolframConfig {
    /// Query endpoint (default: the public v2 API).
    pub base_url: String,
    /// Lookups per resolution, including disambiguation retries.
    pub max_attempts: u32,
    /// Deadline covering every attempt of one resolution.
    pub deadline: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// App ID used by the CLI when none is passed explicitly.
    pub appid: Option<SecretString>,
}

impl Default for WolframConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WOLFRAM_BASE_URL.to_string(),
            max_attempts: 3,
            deadline: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            appid: None,
        }
    }
}

impl WolframConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = optional_env("WOLFRAM_BASE_URL")?.unwrap_or(defaults.base_url);
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ConfigError::InvalidValue {
                key: "WOLFRAM_BASE_URL".to_string(),
                message: "must start with http:// or https://".to_string(),
            });
        }

        let max_attempts = parse_optional_env("WOLFRAM_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WOLFRAM_MAX_ATTEMPTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let deadline = parse_positive_secs("WOLFRAM_DEADLINE_SECS", defaults.deadline)?;
        let request_timeout = parse_positive_secs("HTTP_TIMEOUT_SECS", defaults.request_timeout)?;

        Ok(Self {
            base_url,
            max_attempts,
            deadline,
            request_timeout,
            appid: optional_env("WOLFRAM_APPID")?.map(SecretString::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::helpers::ENV_MUTEX;
    use secrecy::ExposeSecret;

    fn clear_wolfram_env() {
        // SAFETY: Only called under ENV_MUTEX in tests.
        unsafe {
            std::env::remove_var("WOLFRAM_BASE_URL");
            std::env::remove_var("WOLFRAM_MAX_ATTEMPTS");
            std::env::remove_var("WOLFRAM_DEADLINE_SECS");
            std::env::remove_var("HTTP_TIMEOUT_SECS");
            std::env::remove_var("WOLFRAM_APPID");
        }
    }

    #[test]
    fn defaults_when_unset() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_wolfram_env();

        let config = WolframConfig::resolve().expect("resolve should succeed");
        assert_eq!(config.base_url, DEFAULT_WOLFRAM_BASE_URL);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.deadline, Duration::from_secs(30));
        assert!(config.appid.is_none());
    }

    #[test]
    fn env_overrides() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_wolfram_env();
        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::set_var("WOLFRAM_MAX_ATTEMPTS", "5");
            std::env::set_var("WOLFRAM_DEADLINE_SECS", "12");
            std::env::set_var("WOLFRAM_APPID", "APP-1");
        }

        let config = WolframConfig::resolve().expect("resolve should succeed");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.deadline, Duration::from_secs(12));
        assert_eq!(config.appid.as_ref().map(|s| s.expose_secret()), Some("APP-1"));

        clear_wolfram_env();
    }

    #[test]
    fn zero_attempts_rejected() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_wolfram_env();
        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::set_var("WOLFRAM_MAX_ATTEMPTS", "0");
        }

        let err = WolframConfig::resolve().unwrap_err();
        assert!(err.to_string().contains("WOLFRAM_MAX_ATTEMPTS"));

        clear_wolfram_env();
    }

    #[test]
    fn zero_deadline_and_timeout_rejected() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_wolfram_env();
        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::set_var("WOLFRAM_DEADLINE_SECS", "0");
        }
        let err = WolframConfig::resolve().unwrap_err();
        assert!(err.to_string().contains("WOLFRAM_DEADLINE_SECS"));

        clear_wolfram_env();
        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::set_var("HTTP_TIMEOUT_SECS", "0");
        }
        let err = WolframConfig::resolve().unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));

        clear_wolfram_env();
    }

    #[test]
    fn non_http_base_url_rejected() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        clear_wolfram_env();
        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::set_var("WOLFRAM_BASE_URL", "ftp://example.com");
        }

        assert!(WolframConfig::resolve().is_err());

        clear_wolfram_env();
    }
}
