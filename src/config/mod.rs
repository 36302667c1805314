//! Configuration for toolgate.
//!
//! Everything comes from environment variables with defaults. A `.env` file
//! in the working directory is loaded first via dotenvy, which never
//! overwrites variables that are already set.

mod api;
pub(crate) mod helpers;
mod wolfram;

pub use api::ApiToolsConfig;
pub use wolfram::{DEFAULT_WOLFRAM_BASE_URL, WolframConfig};

use crate::error::ConfigError;

/// Main configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub wolfram: WolframConfig,
    pub api_tools: ApiToolsConfig,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::resolve()
    }

    /// Resolve every section from the current environment.
    pub fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            wolfram: WolframConfig::resolve()?,
            api_tools: ApiToolsConfig::resolve()?,
        })
    }
}
