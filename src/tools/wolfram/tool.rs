//! Wolfram Alpha tool.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::WolframConfig;
use crate::context::ToolInvocation;
use crate::error::LookupError;
use crate::tools::tool::{Tool, ToolError, ToolOutput};
use crate::tools::wolfram::client::{AnswerEngine, WolframAlphaClient};
use crate::tools::wolfram::resolver::{QueryResolver, ResolutionOutcome};

/// Credential field holding the Wolfram Alpha app ID.
pub const APPID_FIELD: &str = "appid";

/// Answers math, science and factual questions through Wolfram Alpha.
pub struct WolframAlphaTool {
    resolver: QueryResolver,
}

impl WolframAlphaTool {
    /// Build the tool against the real Wolfram Alpha API.
    pub fn new(config: &WolframConfig) -> Result<Self, LookupError> {
        let client = WolframAlphaClient::new(config)?;
        Ok(Self::with_engine(Arc::new(client), config))
    }

    /// Build the tool against any answer engine.
    pub fn with_engine(engine: Arc<dyn AnswerEngine>, config: &WolframConfig) -> Self {
        Self {
            resolver: QueryResolver::new(engine)
                .with_max_attempts(config.max_attempts)
                .with_deadline(config.deadline),
        }
    }
}

#[async_trait]
impl Tool for WolframAlphaTool {
    fn name(&self) -> &str {
        "wolframalpha"
    }

    fn description(&self) -> &str {
        "Answer math, science, unit conversion and factual questions using Wolfram Alpha. \
         Returns a short plaintext answer or a link to the source."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question or expression to look up"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutput, ToolError> {
        let start = std::time::Instant::now();

        // An empty query goes back to the model as a prompt, not a failure.
        let Some(query) = query_text(&params)? else {
            return Ok(ToolOutput::text("Please input query", start.elapsed()));
        };
        let appid = invocation.credentials.require(APPID_FIELD)?;

        let output = match self.resolver.resolve(&query, appid).await? {
            ResolutionOutcome::Link(url) => ToolOutput::link(url, start.elapsed()),
            ResolutionOutcome::Text(text) => ToolOutput::text(text, start.elapsed()),
            ResolutionOutcome::NotFound => ToolOutput::text("No result found", start.elapsed()),
        };

        tracing::debug!(
            invocation_id = %invocation.invocation_id,
            user_id = %invocation.user_id,
            elapsed_ms = output.duration.as_millis() as u64,
            "Wolfram Alpha tool finished"
        );
        Ok(output)
    }

    fn execution_timeout(&self) -> std::time::Duration {
        self.resolver.deadline()
    }
}

/// The query as text. Numbers and booleans are sent as written; a missing,
/// null or empty query is `None`.
fn query_text(params: &serde_json::Value) -> Result<Option<String>, ToolError> {
    match params.get("query") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(ToolError::InvalidParameters(format!(
            "query must be text, got {}",
            other
        ))),
    }
}
