use std::time::Duration;

use crate::config::helpers::parse_positive_secs;
use crate::error::ConfigError;

/// Settings for user-registered HTTP API tools.
#[derive(Debug, Clone)]
pub struct ApiToolsConfig {
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for ApiToolsConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiToolsConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            request_timeout: parse_positive_secs(
                "HTTP_TIMEOUT_SECS",
                Self::default().request_timeout,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::helpers::ENV_MUTEX;

    #[test]
    fn zero_timeout_rejected() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::set_var("HTTP_TIMEOUT_SECS", "0");
        }

        let err = ApiToolsConfig::resolve().unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));

        // SAFETY: Under ENV_MUTEX.
        unsafe {
            std::env::remove_var("HTTP_TIMEOUT_SECS");
        }
        assert_eq!(
            ApiToolsConfig::resolve().unwrap().request_timeout,
            Duration::from_secs(10)
        );
    }
}
