//! Error types for toolgate.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] crate::tools::ToolError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Failures talking to an answer engine.
///
/// Every variant is a transport-class failure: the resolver never retries
/// them and surfaces the message verbatim.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from tool providers and their repositories.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider {name} not found")]
    NotFound { name: String },

    #[error("Credential validation failed for provider {provider}: {reason}")]
    CredentialValidation { provider: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
