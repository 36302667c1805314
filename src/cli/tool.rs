//! Tool CLI commands.

use std::path::Path;
use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::cli::ScopeArgs;
use crate::config::Config;
use crate::context::ToolInvocation;
use crate::secrets::Credentials;
use crate::tools::ToolProvider;
use crate::tools::provider::{
    ApiBasedToolProvider, ApiProviderRecord, InMemoryProviderRepository, ProviderScope,
    TimeProvider, WolframAlphaProvider,
};
use crate::tools::wolfram::{APPID_FIELD, WolframAlphaTool};
use crate::tools::{ToolMessage, ToolRegistry};

/// Parse a `key=value` argument.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Turn `key=value` pairs into a JSON object, parsing values as JSON where
/// they are valid JSON and keeping them as strings otherwise.
fn params_object(pairs: &[(String, String)]) -> serde_json::Value {
    let map = pairs
        .iter()
        .map(|(k, v)| {
            let value = serde_json::from_str(v)
                .unwrap_or_else(|_| serde_json::Value::String(v.clone()));
            (k.clone(), value)
        })
        .collect();
    serde_json::Value::Object(map)
}

async fn load_api_records(path: Option<&Path>) -> anyhow::Result<Vec<ApiProviderRecord>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = tokio::fs::read_to_string(path).await?;
    let records: Vec<ApiProviderRecord> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid API provider file {}: {}", path.display(), e))?;
    Ok(records)
}

/// Every provider the CLI knows about.
struct Providers {
    wolfram: WolframAlphaProvider,
    time: TimeProvider,
    api: ApiBasedToolProvider,
}

impl Providers {
    async fn build(config: &Config, api_file: Option<&Path>) -> anyhow::Result<Self> {
        let wolfram_tool = Arc::new(WolframAlphaTool::new(&config.wolfram)?);
        let repository = Arc::new(InMemoryProviderRepository::from_records(
            load_api_records(api_file).await?,
        ));

        Ok(Self {
            wolfram: WolframAlphaProvider::new(wolfram_tool),
            time: TimeProvider::new(),
            api: ApiBasedToolProvider::new(repository, &config.api_tools)?,
        })
    }

    fn get(&self, name: &str) -> Option<&dyn ToolProvider> {
        let provider: &dyn ToolProvider = match name {
            "wolframalpha" => &self.wolfram,
            "time" => &self.time,
            "api" => &self.api,
            _ => return None,
        };
        Some(provider)
    }

    async fn registry(&self, scope: &ProviderScope) -> anyhow::Result<ToolRegistry> {
        let registry = ToolRegistry::new();
        for provider in [
            &self.wolfram as &dyn ToolProvider,
            &self.time as &dyn ToolProvider,
            &self.api as &dyn ToolProvider,
        ] {
            registry.register_provider(provider, scope).await?;
        }
        Ok(registry)
    }
}

fn scope_of(args: &ScopeArgs) -> ProviderScope {
    ProviderScope::new(args.user.clone(), args.tenant.clone())
}

/// List the tools visible to a scope.
pub async fn run_tools_command(scope: ScopeArgs, verbose: bool) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let providers = Providers::build(&config, scope.api_providers.as_deref()).await?;
    let registry = providers.registry(&scope_of(&scope)).await?;

    for def in registry.tool_definitions().await {
        if verbose {
            println!("{}", serde_json::to_string_pretty(&def)?);
        } else {
            println!("{:<24} {}", def.name, def.description);
        }
    }
    Ok(())
}

/// Invoke one tool and print its message.
pub async fn run_invoke_command(
    tool: String,
    params: Vec<(String, String)>,
    credentials: Vec<(String, String)>,
    scope: ScopeArgs,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let providers = Providers::build(&config, scope.api_providers.as_deref()).await?;
    let registry = providers.registry(&scope_of(&scope)).await?;

    let mut creds: Credentials = credentials.into_iter().collect();
    if creds.get(APPID_FIELD).is_none()
        && let Some(appid) = config.wolfram.appid.as_ref()
    {
        creds.insert(APPID_FIELD, appid.expose_secret());
    }

    let invocation = ToolInvocation::new(scope.user.clone()).with_credentials(creds);
    let output = registry
        .invoke(&tool, params_object(&params), &invocation)
        .await?;

    match output.message {
        ToolMessage::Text(text) => println!("{}", text),
        ToolMessage::Link(url) => println!("Link: {}", url),
    }
    tracing::debug!("{} finished in {:?}", tool, output.duration);
    Ok(())
}

/// Validate credentials for a named provider.
pub async fn run_validate_command(
    provider: String,
    credentials: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let providers = Providers::build(&config, None).await?;
    let target = providers
        .get(&provider)
        .ok_or_else(|| crate::error::ProviderError::NotFound {
            name: provider.clone(),
        })?;

    let creds: Credentials = credentials.into_iter().collect();
    target.validate_credentials(&creds).await?;
    println!("Credentials for '{}' are valid", provider);
    Ok(())
}
