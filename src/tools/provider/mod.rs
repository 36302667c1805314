//! Tool providers.
//!
//! A provider groups the tools backed by one external service and owns the
//! credential check for that service. Built-in providers have a fixed tool
//! list; the API-based provider builds tools from user and tenant
//! registrations fetched through a [`ProviderRepository`].

mod api;
mod api_tool;
mod builtin;

pub use api::{
    ApiBasedToolProvider, ApiProviderRecord, ApiToolBundle, ApiToolParameter, ApiParamType,
    InMemoryProviderRepository, ProviderRepository,
};
pub use api_tool::ApiTool;
pub use builtin::{TimeProvider, WolframAlphaProvider};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::secrets::Credentials;
use crate::tools::tool::Tool;

/// How a provider's tools come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Compiled into the binary.
    Builtin,
    /// Registered by a user or tenant as an HTTP API description.
    ApiBased,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Builtin => "builtin",
            Self::ApiBased => "api",
        };
        write!(f, "{}", s)
    }
}

/// Who is asking for tools.
#[derive(Debug, Clone, Default)]
pub struct ProviderScope {
    pub user_id: String,
    pub tenant_id: Option<String>,
}

impl ProviderScope {
    pub fn new(user_id: impl Into<String>, tenant_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id,
        }
    }
}

/// A source of tools sharing one set of credentials.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Provider identifier.
    fn name(&self) -> &str;

    fn kind(&self) -> ProviderKind;

    /// Tools available to the given scope.
    async fn tools(&self, scope: &ProviderScope) -> Result<Vec<Arc<dyn Tool>>, ProviderError>;

    /// Check that the credentials work for this provider.
    async fn validate_credentials(&self, credentials: &Credentials) -> Result<(), ProviderError>;
}
