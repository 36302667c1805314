//! Built-in providers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::ToolInvocation;
use crate::error::ProviderError;
use crate::secrets::Credentials;
use crate::tools::builtin::CurrentTimeTool;
use crate::tools::provider::{ProviderKind, ProviderScope, ToolProvider};
use crate::tools::tool::Tool;
use crate::tools::wolfram::{APPID_FIELD, WolframAlphaTool};

/// Provider for the Wolfram Alpha tool.
pub struct WolframAlphaProvider {
    tool: Arc<WolframAlphaTool>,
}

impl WolframAlphaProvider {
    pub fn new(tool: Arc<WolframAlphaTool>) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl ToolProvider for WolframAlphaProvider {
    fn name(&self) -> &str {
        "wolframalpha"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Builtin
    }

    async fn tools(&self, _scope: &ProviderScope) -> Result<Vec<Arc<dyn Tool>>, ProviderError> {
        Ok(vec![self.tool.clone() as Arc<dyn Tool>])
    }

    /// Only checks that an app ID is present; no query is spent on it.
    async fn validate_credentials(&self, credentials: &Credentials) -> Result<(), ProviderError> {
        let result = match credentials.require(APPID_FIELD) {
            Ok(_) => self.tool.validate_credentials(credentials).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            tracing::warn!(provider = self.name(), "Credential validation failed: {}", e);
            ProviderError::CredentialValidation {
                provider: self.name().to_string(),
                reason: e.to_string(),
            }
        })
    }
}

/// Provider for the time utility tools.
pub struct TimeProvider {
    tool: Arc<CurrentTimeTool>,
}

impl TimeProvider {
    pub fn new() -> Self {
        Self {
            tool: Arc::new(CurrentTimeTool),
        }
    }
}

impl Default for TimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for TimeProvider {
    fn name(&self) -> &str {
        "time"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Builtin
    }

    async fn tools(&self, _scope: &ProviderScope) -> Result<Vec<Arc<dyn Tool>>, ProviderError> {
        Ok(vec![self.tool.clone() as Arc<dyn Tool>])
    }

    /// Validates by running `current_time` once with no parameters.
    async fn validate_credentials(&self, credentials: &Credentials) -> Result<(), ProviderError> {
        let invocation = ToolInvocation::new("").with_credentials(credentials.clone());
        self.tool
            .execute(serde_json::json!({}), &invocation)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::warn!(provider = self.name(), "Credential validation failed: {}", e);
                ProviderError::CredentialValidation {
                    provider: self.name().to_string(),
                    reason: e.to_string(),
                }
            })
    }
}
