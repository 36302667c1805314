//! Query disambiguation loop.
//!
//! Wolfram Alpha answers an ambiguous query with "did you mean" suggestions
//! instead of a result. The resolver re-issues the query with the best
//! suggestion until it gets a link or a plaintext answer, or runs out of
//! attempts. Disambiguation is not guaranteed to converge, so the attempt
//! count is capped and the whole loop runs under one deadline.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::tools::tool::ToolError;
use crate::tools::wolfram::client::AnswerEngine;

/// Default number of lookups per resolution.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default deadline covering every attempt of one resolution.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// An alternative interpretation offered by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub candidate_text: String,
    pub confidence_score: f64,
}

impl Suggestion {
    pub fn new(candidate_text: impl Into<String>, confidence_score: f64) -> Self {
        Self {
            candidate_text: candidate_text.into(),
            confidence_score,
        }
    }
}

/// What a single lookup produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    /// Never empty.
    Ambiguous(Vec<Suggestion>),
    LinkAnswer(String),
    DirectAnswer(String),
    /// Nothing recognizable in the body.
    Empty,
}

/// Terminal value of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Link(String),
    Text(String),
    NotFound,
}

/// Classify a raw response body.
///
/// Precedence: suggestions, then source link, then the first subpod's
/// plaintext. A body without `queryresult` is malformed.
pub fn classify(body: &serde_json::Value) -> Result<LookupResult, LookupError> {
    let result = body
        .get("queryresult")
        .filter(|v| v.is_object())
        .ok_or_else(|| LookupError::InvalidResponse("missing 'queryresult' object".into()))?;

    if let Some(raw) = result.get("didyoumeans") {
        let suggestions = parse_suggestions(raw);
        if !suggestions.is_empty() {
            return Ok(LookupResult::Ambiguous(suggestions));
        }
    }

    if let Some(url) = result.get("sources").and_then(source_url) {
        return Ok(LookupResult::LinkAnswer(url.to_string()));
    }

    if let Some(text) = result
        .pointer("/pods/0/subpods/0/plaintext")
        .and_then(|v| v.as_str())
    {
        return Ok(LookupResult::DirectAnswer(text.to_string()));
    }

    Ok(LookupResult::Empty)
}

/// `didyoumeans` is an array, or a bare object when there is only one.
/// Entries without a text or a finite numeric score are dropped.
fn parse_suggestions(raw: &serde_json::Value) -> Vec<Suggestion> {
    let entries: Vec<&serde_json::Value> = match raw {
        serde_json::Value::Array(items) => items.iter().collect(),
        obj @ serde_json::Value::Object(_) => vec![obj],
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let text = entry.get("val")?.as_str()?;
            let score = match entry.get("score")? {
                serde_json::Value::Number(n) => n.as_f64()?,
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
                _ => return None,
            };
            score.is_finite().then(|| Suggestion::new(text, score))
        })
        .collect()
}

/// `sources` is an object, or an array of objects.
fn source_url(sources: &serde_json::Value) -> Option<&str> {
    match sources {
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|s| s.get("url").and_then(|u| u.as_str())),
        other => other.get("url").and_then(|u| u.as_str()),
    }
}

/// Pick the suggestion with the strictly highest score.
///
/// A later suggestion with an equal score never replaces an earlier one.
pub fn best_suggestion(suggestions: &[Suggestion]) -> Option<&Suggestion> {
    let mut iter = suggestions.iter();
    let mut best = iter.next()?;
    for candidate in iter {
        if candidate.confidence_score > best.confidence_score {
            best = candidate;
        }
    }
    Some(best)
}

/// Resolves a free-text query against an answer engine.
pub struct QueryResolver {
    engine: Arc<dyn AnswerEngine>,
    max_attempts: u32,
    deadline: Duration,
}

impl QueryResolver {
    /// Create a resolver with the default budget (3 attempts, 30s).
    pub fn new(engine: Arc<dyn AnswerEngine>) -> Self {
        Self {
            engine,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the deadline for a whole resolution.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Resolve with the configured attempt budget.
    pub async fn resolve(
        &self,
        initial_query: &str,
        credential: &str,
    ) -> Result<ResolutionOutcome, ToolError> {
        self.resolve_with_budget(initial_query, credential, self.max_attempts)
            .await
    }

    /// Resolve with an explicit attempt budget.
    ///
    /// Input checks happen before any lookup. Transport failures abort
    /// immediately; running out of attempts yields `NotFound`.
    pub async fn resolve_with_budget(
        &self,
        initial_query: &str,
        credential: &str,
        max_attempts: u32,
    ) -> Result<ResolutionOutcome, ToolError> {
        if initial_query.is_empty() {
            return Err(ToolError::InvalidParameters("Please input query".into()));
        }
        if credential.is_empty() {
            return Err(ToolError::MissingCredential("Please input appid".into()));
        }

        tokio::time::timeout(
            self.deadline,
            self.run_attempts(initial_query, credential, max_attempts),
        )
        .await
        .map_err(|_| ToolError::Timeout(self.deadline))?
    }

    async fn run_attempts(
        &self,
        initial_query: &str,
        credential: &str,
        max_attempts: u32,
    ) -> Result<ResolutionOutcome, ToolError> {
        let mut query = initial_query.to_string();
        let mut attempt = 0;

        while attempt < max_attempts {
            attempt += 1;
            tracing::debug!(attempt, max_attempts, query = %query, "Wolfram lookup");

            let body = self
                .engine
                .lookup(&query, credential)
                .await
                .map_err(|e| ToolError::ExternalService(e.to_string()))?;

            match classify(&body).map_err(|e| ToolError::ExternalService(e.to_string()))? {
                LookupResult::LinkAnswer(url) => return Ok(ResolutionOutcome::Link(url)),
                LookupResult::DirectAnswer(text) if !text.is_empty() => {
                    return Ok(ResolutionOutcome::Text(text));
                }
                LookupResult::Ambiguous(suggestions) => {
                    // classify never yields an empty suggestion list
                    let Some(best) = best_suggestion(&suggestions) else {
                        return Ok(ResolutionOutcome::NotFound);
                    };
                    tracing::debug!(
                        attempt,
                        suggestion = %best.candidate_text,
                        score = best.confidence_score,
                        "Query ambiguous, refining"
                    );
                    query = best.candidate_text.clone();
                }
                LookupResult::DirectAnswer(_) | LookupResult::Empty => {
                    return Ok(ResolutionOutcome::NotFound);
                }
            }
        }

        tracing::debug!(max_attempts, "Attempt budget exhausted without an answer");
        Ok(ResolutionOutcome::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubEngine;
    use serde_json::json;

    fn ambiguous(pairs: &[(&str, f64)]) -> serde_json::Value {
        let items: Vec<_> = pairs
            .iter()
            .map(|(val, score)| json!({"val": val, "score": score.to_string()}))
            .collect();
        json!({"queryresult": {"success": false, "didyoumeans": items}})
    }

    fn direct(text: &str) -> serde_json::Value {
        json!({"queryresult": {"pods": [{"subpods": [{"plaintext": text}]}]}})
    }

    fn link(url: &str) -> serde_json::Value {
        json!({"queryresult": {"sources": {"url": url}}})
    }

    #[test]
    fn test_classify_direct_answer() {
        assert_eq!(
            classify(&direct("4")).unwrap(),
            LookupResult::DirectAnswer("4".into())
        );
    }

    #[test]
    fn test_classify_link_beats_pods() {
        let body = json!({"queryresult": {
            "sources": [{"url": "https://example.com/a"}],
            "pods": [{"subpods": [{"plaintext": "x"}]}]
        }});
        assert_eq!(
            classify(&body).unwrap(),
            LookupResult::LinkAnswer("https://example.com/a".into())
        );
    }

    #[test]
    fn test_classify_single_didyoumean_object() {
        let body = json!({"queryresult": {"didyoumeans": {"val": "pi", "score": "0.42"}}});
        assert_eq!(
            classify(&body).unwrap(),
            LookupResult::Ambiguous(vec![Suggestion::new("pi", 0.42)])
        );
    }

    #[test]
    fn test_classify_unusable_didyoumeans_falls_through() {
        let body = json!({"queryresult": {
            "didyoumeans": [{"val": "x", "score": "high"}],
            "pods": [{"subpods": [{"plaintext": "7"}]}]
        }});
        assert_eq!(
            classify(&body).unwrap(),
            LookupResult::DirectAnswer("7".into())
        );
    }

    #[test]
    fn test_classify_drops_non_finite_scores() {
        let body = json!({"queryresult": {"didyoumeans": [
            {"val": "a", "score": "NaN"},
            {"val": "b", "score": "0.9"},
            {"val": "c", "score": "inf"},
        ]}});
        let LookupResult::Ambiguous(suggestions) = classify(&body).unwrap() else {
            panic!("expected suggestions");
        };
        assert_eq!(suggestions, vec![Suggestion::new("b", 0.9)]);
        assert_eq!(best_suggestion(&suggestions).unwrap().candidate_text, "b");
    }

    #[test]
    fn test_classify_empty_and_malformed() {
        assert_eq!(
            classify(&json!({"queryresult": {"success": false}})).unwrap(),
            LookupResult::Empty
        );
        assert!(classify(&json!({"error": "nope"})).is_err());
    }

    #[test]
    fn test_best_suggestion_first_max_wins() {
        let suggestions = vec![
            Suggestion::new("a", 0.5),
            Suggestion::new("b", 0.9),
            Suggestion::new("c", 0.9),
        ];
        assert_eq!(best_suggestion(&suggestions).unwrap().candidate_text, "b");
        assert!(best_suggestion(&[]).is_none());
    }

    #[tokio::test]
    async fn test_direct_answer_single_lookup() {
        let engine = Arc::new(StubEngine::new(vec![Ok(direct("42"))]));
        let resolver = QueryResolver::new(engine.clone());

        let outcome = resolver.resolve("meaning of life", "APPID").await.unwrap();
        assert_eq!(outcome, ResolutionOutcome::Text("42".into()));
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_link_answer_stops_early() {
        let engine = Arc::new(StubEngine::new(vec![
            Ok(ambiguous(&[("x", 0.3)])),
            Ok(link("https://www.wolframalpha.com/x")),
            Ok(direct("unused")),
        ]));
        let resolver = QueryResolver::new(engine.clone()).with_max_attempts(5);

        let outcome = resolver.resolve("x?", "APPID").await.unwrap();
        assert_eq!(
            outcome,
            ResolutionOutcome::Link("https://www.wolframalpha.com/x".into())
        );
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_ambiguous_refines_with_first_best() {
        let engine = Arc::new(StubEngine::new(vec![
            Ok(ambiguous(&[("a", 0.5), ("b", 0.9), ("c", 0.9)])),
            Ok(direct("answer for b")),
        ]));
        let resolver = QueryResolver::new(engine.clone());

        let outcome = resolver.resolve("abc", "APPID").await.unwrap();
        assert_eq!(outcome, ResolutionOutcome::Text("answer for b".into()));
        assert_eq!(engine.queries(), vec!["abc".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_budget_exhausted_is_not_found() {
        let engine = Arc::new(StubEngine::repeating(ambiguous(&[("again", 0.1)])));
        let resolver = QueryResolver::new(engine.clone());

        let outcome = resolver.resolve_with_budget("loop", "APPID", 3).await.unwrap();
        assert_eq!(outcome, ResolutionOutcome::NotFound);
        assert_eq!(engine.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_text_is_not_found() {
        let engine = Arc::new(StubEngine::new(vec![Ok(direct(""))]));
        let resolver = QueryResolver::new(engine.clone());

        let outcome = resolver.resolve("q", "APPID").await.unwrap();
        assert_eq!(outcome, ResolutionOutcome::NotFound);
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_lookup() {
        let engine = Arc::new(StubEngine::new(vec![Ok(direct("x"))]));
        let resolver = QueryResolver::new(engine.clone());

        let err = resolver.resolve("", "APPID").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_rejected_before_lookup() {
        let engine = Arc::new(StubEngine::new(vec![Ok(direct("x"))]));
        let resolver = QueryResolver::new(engine.clone());

        let err = resolver.resolve("query", "").await.unwrap_err();
        assert!(matches!(err, ToolError::MissingCredential(_)));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts() {
        let engine = Arc::new(StubEngine::new(vec![
            Err(LookupError::Request("connection refused".into())),
            Ok(direct("never reached")),
        ]));
        let resolver = QueryResolver::new(engine.clone());

        let err = resolver.resolve("q", "APPID").await.unwrap_err();
        match err {
            ToolError::ExternalService(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let engine = Arc::new(StubEngine::new(vec![Ok(json!({"unexpected": true}))]));
        let resolver = QueryResolver::new(engine);

        let err = resolver.resolve("q", "APPID").await.unwrap_err();
        assert!(matches!(err, ToolError::ExternalService(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_covers_all_attempts() {
        let engine = Arc::new(
            StubEngine::repeating(ambiguous(&[("slow", 0.5)])).with_delay(Duration::from_secs(4)),
        );
        let resolver = QueryResolver::new(engine.clone())
            .with_max_attempts(3)
            .with_deadline(Duration::from_secs(10));

        let err = resolver.resolve("slow", "APPID").await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout(d) if d == Duration::from_secs(10)));
        assert_eq!(engine.calls(), 3);
    }
}
