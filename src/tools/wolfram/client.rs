//! HTTP client for the Wolfram Alpha full results API.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::WolframConfig;
use crate::error::LookupError;

/// Something that answers free-text queries with a raw JSON body.
///
/// The resolver only ever talks to this trait, so tests drive it with a
/// scripted stub instead of the network.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    /// Perform one lookup. Transport and decode failures are errors; any
    /// well-formed JSON body is returned as-is for classification.
    async fn lookup(&self, query: &str, credential: &str)
    -> Result<serde_json::Value, LookupError>;
}

/// Wolfram Alpha v2 query client.
pub struct WolframAlphaClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl WolframAlphaClient {
    /// Create a client from config.
    pub fn new(config: &WolframConfig) -> Result<Self, LookupError> {
        Self::with_base_url(&config.base_url, config.request_timeout)
    }

    /// Create a client pointed at an arbitrary endpoint.
    pub fn with_base_url(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LookupError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Query string sent with every lookup.
pub(crate) fn query_params<'a>(query: &'a str, appid: &'a str) -> [(&'static str, &'a str); 5] {
    [
        ("appid", appid),
        ("input", query),
        ("includepodid", "Result"),
        ("format", "plaintext"),
        ("output", "json"),
    ]
}

/// Flatten an error and its sources into one line.
fn error_chain(e: &reqwest::Error) -> String {
    let mut chain = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        chain.push_str(&format!(" -> {}", cause));
        source = cause.source();
    }
    chain
}

#[async_trait]
impl AnswerEngine for WolframAlphaClient {
    async fn lookup(
        &self,
        query: &str,
        credential: &str,
    ) -> Result<serde_json::Value, LookupError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&query_params(query, credential))
            .send()
            .await
            .map_err(|e| LookupError::Request(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::InvalidResponse(error_chain(&e)))
    }
}
