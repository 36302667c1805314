//! Test doubles for driving tools without the network.
//!
//! Provides:
//! - [`StubEngine`]: a scripted [`AnswerEngine`] that counts calls and
//!   records every query it was asked
//! - [`serve_once`]: a one-shot local HTTP server for exercising real
//!   `reqwest` clients
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use toolgate::testing::StubEngine;
//! use toolgate::tools::wolfram::QueryResolver;
//!
//! # async fn demo() {
//! let engine = Arc::new(StubEngine::repeating(serde_json::json!({
//!     "queryresult": {"pods": [{"subpods": [{"plaintext": "4"}]}]}
//! })));
//! let resolver = QueryResolver::new(engine.clone());
//! let _ = resolver.resolve("2+2", "APPID").await;
//! assert_eq!(engine.calls(), 1);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::LookupError;
use crate::tools::wolfram::AnswerEngine;

/// A scripted answer engine.
///
/// Responses are handed out in order. Once the script runs dry the stub
/// either repeats a fixed body (see [`repeating`](Self::repeating)) or fails
/// with a request error.
pub struct StubEngine {
    script: Mutex<VecDeque<Result<serde_json::Value, LookupError>>>,
    repeat: Option<serde_json::Value>,
    delay: Option<Duration>,
    call_count: AtomicU32,
    queries: Mutex<Vec<String>>,
}

impl StubEngine {
    /// Create a stub that returns the given responses in order.
    pub fn new(script: Vec<Result<serde_json::Value, LookupError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat: None,
            delay: None,
            call_count: AtomicU32::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub that returns the same body forever.
    pub fn repeating(body: serde_json::Value) -> Self {
        Self {
            repeat: Some(body),
            ..Self::new(Vec::new())
        }
    }

    /// Sleep before answering each lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups performed.
    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AnswerEngine for StubEngine {
    async fn lookup(
        &self,
        query: &str,
        _credential: &str,
    ) -> Result<serde_json::Value, LookupError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match (next, &self.repeat) {
            (Some(response), _) => response,
            (None, Some(body)) => Ok(body.clone()),
            (None, None) => Err(LookupError::Request("stub script exhausted".into())),
        }
    }
}

/// Serve exactly one HTTP request on a random local port.
///
/// Returns the URL to call (path `/query`) and a handle resolving to the raw
/// request text (request line, headers and body) once the canned response
/// has been written.
///
/// # Panics
///
/// Panics if the local socket cannot be bound or the connection breaks,
/// which only happens in a broken test environment.
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let url = format!(
        "http://{}/query",
        listener.local_addr().expect("listener has no address")
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept failed");
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];

        // Headers first, then as much body as Content-Length announces.
        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read failed");
            if n == 0 {
                break raw.len();
            }
            raw.extend_from_slice(&chunk[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let content_length = String::from_utf8_lossy(&raw[..header_end])
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while raw.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.expect("read failed");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write failed");
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&raw).to_string()
    });

    (url, handle)
}
