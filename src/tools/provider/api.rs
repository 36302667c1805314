//! User- and tenant-registered HTTP API tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::ApiToolsConfig;
use crate::error::ProviderError;
use crate::secrets::Credentials;
use crate::tools::provider::api_tool::ApiTool;
use crate::tools::provider::{ProviderKind, ProviderScope, ToolProvider};
use crate::tools::tool::Tool;

/// JSON type of an API tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiParamType {
    #[default]
    String,
    Number,
    Boolean,
}

impl ApiParamType {
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// One parameter of a registered API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiToolParameter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "type")]
    pub param_type: ApiParamType,
}

fn default_method() -> String {
    "GET".to_string()
}

/// A single API operation as registered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiToolBundle {
    pub author: String,
    /// Becomes the tool name.
    pub operation_id: String,
    /// Becomes the tool description.
    pub summary: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub server_url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<ApiToolParameter>,
}

/// A stored API provider registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiProviderRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Set for team-wide registrations.
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub tools: Vec<ApiToolBundle>,
}

/// Read-only access to stored API provider registrations.
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Providers registered for a whole tenant.
    async fn list_providers_for_tenant(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<ApiProviderRecord>, ProviderError>;

    /// Providers a user registered outside any tenant.
    async fn list_providers_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ApiProviderRecord>, ProviderError>;
}

/// In-memory repository, used by the CLI and tests.
#[derive(Default)]
pub struct InMemoryProviderRepository {
    records: RwLock<Vec<ApiProviderRecord>>,
}

impl InMemoryProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a list of records.
    pub fn from_records(records: Vec<ApiProviderRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn add(&self, record: ApiProviderRecord) {
        self.records.write().await.push(record);
    }
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn list_providers_for_tenant(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<ApiProviderRecord>, ProviderError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.tenant_id.as_deref() == Some(tenant_id))
            .cloned()
            .collect())
    }

    async fn list_providers_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ApiProviderRecord>, ProviderError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.tenant_id.is_none())
            .cloned()
            .collect())
    }
}

/// Provider that turns API registrations into tools.
pub struct ApiBasedToolProvider {
    repository: Arc<dyn ProviderRepository>,
    http_client: reqwest::Client,
}

impl ApiBasedToolProvider {
    pub fn new(
        repository: Arc<dyn ProviderRepository>,
        config: &ApiToolsConfig,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::HttpClient(e.to_string()))?;

        Ok(Self {
            repository,
            http_client,
        })
    }

    /// Tools visible to a user: tenant registrations first (team authorized),
    /// then the user's own registrations outside any tenant.
    pub async fn get_tools(
        &self,
        user_id: &str,
        tenant_id: Option<&str>,
    ) -> Result<Vec<ApiTool>, ProviderError> {
        let mut tools = Vec::new();

        if let Some(tenant_id) = tenant_id {
            for record in self.repository.list_providers_for_tenant(tenant_id).await? {
                tools.extend(self.parse_bundles(&record, true));
            }
        }

        for record in self.repository.list_providers_for_user(user_id).await? {
            tools.extend(self.parse_bundles(&record, false));
        }

        tracing::debug!(user_id, ?tenant_id, count = tools.len(), "Loaded API tools");
        Ok(tools)
    }

    fn parse_bundles(
        &self,
        record: &ApiProviderRecord,
        team_authorization: bool,
    ) -> Vec<ApiTool> {
        record
            .tools
            .iter()
            .map(|bundle| {
                ApiTool::new(bundle.clone(), self.http_client.clone())
                    .with_team_authorization(team_authorization)
            })
            .collect()
    }
}

#[async_trait]
impl ToolProvider for ApiBasedToolProvider {
    fn name(&self) -> &str {
        "api"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::ApiBased
    }

    async fn tools(&self, scope: &ProviderScope) -> Result<Vec<Arc<dyn Tool>>, ProviderError> {
        Ok(self
            .get_tools(&scope.user_id, scope.tenant_id.as_deref())
            .await?
            .into_iter()
            .map(|t| Arc::new(t) as Arc<dyn Tool>)
            .collect())
    }

    /// Registered APIs carry their own auth; nothing to check up front.
    async fn validate_credentials(&self, _credentials: &Credentials) -> Result<(), ProviderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(op: &str) -> ApiToolBundle {
        ApiToolBundle {
            author: "alice".into(),
            operation_id: op.into(),
            summary: format!("{} summary", op),
            icon: None,
            server_url: "http://127.0.0.1:1/api".into(),
            method: "GET".into(),
            parameters: Vec::new(),
        }
    }

    fn record(user: &str, tenant: Option<&str>, ops: &[&str]) -> ApiProviderRecord {
        ApiProviderRecord {
            id: Uuid::new_v4(),
            name: format!("{}-provider", user),
            tenant_id: tenant.map(String::from),
            user_id: user.into(),
            tools: ops.iter().map(|op| bundle(op)).collect(),
        }
    }

    fn provider(records: Vec<ApiProviderRecord>) -> ApiBasedToolProvider {
        let repo = Arc::new(InMemoryProviderRepository::from_records(records));
        ApiBasedToolProvider::new(repo, &ApiToolsConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_tenant_tools_first_then_user_only() {
        let provider = provider(vec![
            record("alice", None, &["alice_search"]),
            record("bob", Some("acme"), &["acme_lookup", "acme_create"]),
            record("alice", Some("other"), &["other_tool"]),
            record("carol", None, &["carol_tool"]),
        ]);

        let tools = provider.get_tools("alice", Some("acme")).await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["acme_lookup", "acme_create", "alice_search"]);
        assert!(tools[0].team_authorization());
        assert!(tools[1].team_authorization());
        assert!(!tools[2].team_authorization());
    }

    #[tokio::test]
    async fn test_no_tenant_only_user_tools() {
        let provider = provider(vec![
            record("alice", None, &["alice_search"]),
            record("alice", Some("acme"), &["acme_lookup"]),
        ]);

        let tools = provider
            .tools(&ProviderScope::new("alice", None))
            .await
            .unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "alice_search");
        assert_eq!(tools[0].description(), "alice_search summary");
    }

    #[test]
    fn test_bundle_defaults_from_json() {
        let bundle: ApiToolBundle = serde_json::from_value(serde_json::json!({
            "author": "a",
            "operation_id": "op",
            "summary": "s",
            "server_url": "https://api.example.com/op",
            "parameters": [{"name": "q", "required": true}]
        }))
        .unwrap();
        assert_eq!(bundle.method, "GET");
        assert_eq!(bundle.parameters[0].param_type, ApiParamType::String);
    }
}
