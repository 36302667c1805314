//! Tool trait and types.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ToolInvocation;
use crate::secrets::Credentials;

/// Error type for tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Credential validation failed: {0}")]
    CredentialValidation(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Tool {0} not found")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Message a tool hands back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum ToolMessage {
    Text(String),
    Link(String),
}

impl ToolMessage {
    /// The message body, whichever kind it is.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Link(s) => s,
        }
    }
}

impl std::fmt::Display for ToolMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The message for the model.
    pub message: ToolMessage,
    /// Time taken.
    pub duration: Duration,
}

impl ToolOutput {
    /// Create a text output.
    pub fn text(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: ToolMessage::Text(text.into()),
            duration,
        }
    }

    /// Create a link output.
    pub fn link(url: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: ToolMessage::Link(url.into()),
            duration,
        }
    }
}

/// Definition of a tool's parameters using JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    /// Create a new tool schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Set the parameters schema.
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Trait for tools that the model can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &str;

    /// Get a description of what the tool does.
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutput, ToolError>;

    /// Check provider credentials without doing real work.
    ///
    /// The default accepts anything; tools whose provider needs a live check
    /// override this.
    async fn validate_credentials(&self, _credentials: &Credentials) -> Result<(), ToolError> {
        Ok(())
    }

    /// Maximum time this tool is allowed to run before the caller kills it.
    /// Default: 60 seconds.
    fn execution_timeout(&self) -> Duration {
        Duration::from_secs(60)
    }

    /// Get the tool schema for LLM function calling.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Extract a required string parameter from a JSON object.
///
/// Returns `ToolError::InvalidParameters` if the key is missing or not a string.
pub fn require_str<'a>(params: &'a serde_json::Value, name: &str) -> Result<&'a str, ToolError> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{}' parameter", name)))
}

/// Extract an optional string parameter. Missing, null and empty all map to `None`.
pub fn optional_str<'a>(params: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}
