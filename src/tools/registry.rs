//! Tool registry for managing available tools.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::context::ToolInvocation;
use crate::error::ProviderError;
use crate::tools::builtin::CurrentTimeTool;
use crate::tools::provider::{ProviderScope, ToolProvider};
use crate::tools::tool::{Tool, ToolError, ToolOutput, ToolSchema};
use crate::tools::wolfram::WolframAlphaTool;

/// Registry of available tools, keyed by name.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool. A tool with the same name is replaced.
    pub async fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.write().await.insert(name.clone(), tool);
        tracing::debug!("Registered tool: {}", name);
    }

    /// Register a tool (sync version for startup).
    pub fn register_sync(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if let Ok(mut tools) = self.tools.try_write() {
            tools.insert(name.clone(), tool);
            tracing::debug!("Registered tool: {}", name);
        }
    }

    /// Unregister a tool.
    pub async fn unregister(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.write().await.remove(name)
    }

    /// Get a tool by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().await.get(name).cloned()
    }

    /// Check if a tool exists.
    pub async fn has(&self, name: &str) -> bool {
        self.tools.read().await.contains_key(name)
    }

    /// List all tool names, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.try_read().map(|t| t.len()).unwrap_or(0)
    }

    /// Get tool schemas for LLM function calling, sorted by name.
    pub async fn tool_definitions(&self) -> Vec<ToolSchema> {
        let mut defs: Vec<ToolSchema> = self
            .tools
            .read()
            .await
            .values()
            .map(|tool| tool.schema())
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Look up a tool and run it under its execution timeout.
    pub async fn invoke(
        &self,
        name: &str,
        params: serde_json::Value,
        invocation: &ToolInvocation,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .get(name)
            .await
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let timeout = tool.execution_timeout();
        match tokio::time::timeout(timeout, tool.execute(params, invocation)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(tool = name, "Tool timed out after {:?}", timeout);
                Err(ToolError::Timeout(timeout))
            }
        }
    }

    /// Register all built-in tools.
    pub fn register_builtin_tools(&self, wolfram: Arc<WolframAlphaTool>) {
        self.register_sync(wolfram);
        self.register_sync(Arc::new(CurrentTimeTool));

        tracing::info!("Registered {} built-in tools", self.count());
    }

    /// Register every tool a provider exposes to the given scope.
    pub async fn register_provider(
        &self,
        provider: &dyn ToolProvider,
        scope: &ProviderScope,
    ) -> Result<usize, ProviderError> {
        let tools = provider.tools(scope).await?;
        let count = tools.len();
        for tool in tools {
            self.register(tool).await;
        }

        tracing::info!(
            provider = provider.name(),
            kind = %provider.kind(),
            count,
            "Registered provider tools"
        );
        Ok(count)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WolframConfig;
    use crate::testing::StubEngine;
    use crate::tools::provider::TimeProvider;

    fn wolfram_tool() -> Arc<WolframAlphaTool> {
        Arc::new(WolframAlphaTool::with_engine(
            Arc::new(StubEngine::new(Vec::new())),
            &WolframConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(CurrentTimeTool)).await;

        assert!(registry.has("current_time").await);
        assert!(registry.get("current_time").await.is_some());
        assert!(registry.get("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_builtin_tools() {
        let registry = ToolRegistry::new();
        registry.register_builtin_tools(wolfram_tool());

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.list().await, vec!["current_time", "wolframalpha"]);

        let defs = registry.tool_definitions().await;
        assert_eq!(defs[1].name, "wolframalpha");
        assert_eq!(defs[1].parameters["required"], serde_json::json!(["query"]));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .invoke("missing", serde_json::json!({}), &ToolInvocation::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref n) if n == "missing"));
    }

    #[tokio::test]
    async fn test_register_provider() {
        let registry = ToolRegistry::new();
        let count = registry
            .register_provider(&TimeProvider::new(), &ProviderScope::default())
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert!(registry.has("current_time").await);
        assert!(registry.unregister("current_time").await.is_some());
        assert!(!registry.has("current_time").await);
    }
}
