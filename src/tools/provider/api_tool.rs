//! Tool wrapper around one registered API operation.

use async_trait::async_trait;

use crate::context::ToolInvocation;
use crate::tools::provider::api::ApiToolBundle;
use crate::tools::tool::{Tool, ToolError, ToolOutput};

/// Credential field sent as a bearer token, when present.
pub const API_KEY_FIELD: &str = "api_key";

/// A registered HTTP API operation exposed as a tool.
pub struct ApiTool {
    bundle: ApiToolBundle,
    /// Registered tenant-wide rather than by this user.
    team_authorization: bool,
    http_client: reqwest::Client,
}

impl ApiTool {
    pub fn new(bundle: ApiToolBundle, http_client: reqwest::Client) -> Self {
        Self {
            bundle,
            team_authorization: false,
            http_client,
        }
    }

    pub fn with_team_authorization(mut self, team_authorization: bool) -> Self {
        self.team_authorization = team_authorization;
        self
    }

    pub fn team_authorization(&self) -> bool {
        self.team_authorization
    }

    pub fn bundle(&self) -> &ApiToolBundle {
        &self.bundle
    }

    fn method(&self) -> Result<reqwest::Method, ToolError> {
        reqwest::Method::from_bytes(self.bundle.method.to_ascii_uppercase().as_bytes()).map_err(
            |_| {
                ToolError::ExecutionFailed(format!(
                    "tool {} has invalid HTTP method '{}'",
                    self.bundle.operation_id, self.bundle.method
                ))
            },
        )
    }
}

fn query_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Tool for ApiTool {
    fn name(&self) -> &str {
        &self.bundle.operation_id
    }

    fn description(&self) -> &str {
        &self.bundle.summary
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.bundle.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type.json_type(),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutput, ToolError> {
        let start = std::time::Instant::now();

        let args = match params {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            _ => {
                return Err(ToolError::InvalidParameters(
                    "parameters must be an object".to_string(),
                ));
            }
        };

        for param in self.bundle.parameters.iter().filter(|p| p.required) {
            if args.get(&param.name).is_none_or(|v| v.is_null()) {
                return Err(ToolError::InvalidParameters(format!(
                    "missing '{}' parameter",
                    param.name
                )));
            }
        }

        let method = self.method()?;
        let mut request = self
            .http_client
            .request(method.clone(), &self.bundle.server_url);

        request = if method == reqwest::Method::GET {
            let pairs: Vec<(String, String)> = args
                .iter()
                .map(|(k, v)| (k.clone(), query_value(v)))
                .collect();
            request.query(&pairs)
        } else {
            request.json(&serde_json::Value::Object(args))
        };

        if let Some(key) = invocation.credentials.get(API_KEY_FIELD) {
            request = request.bearer_auth(key);
        }

        tracing::debug!(
            tool = %self.bundle.operation_id,
            method = %method,
            invocation_id = %invocation.invocation_id,
            user_id = %invocation.user_id,
            "Calling registered API"
        );

        let response = request
            .send()
            .await
            .map_err(|e| ToolError::ExternalService(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::ExternalService(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ToolError::ExternalService(format!(
                "{} returned status {}: {}",
                self.bundle.operation_id, status, body
            )));
        }

        Ok(ToolOutput::text(body, start.elapsed()))
    }
}
