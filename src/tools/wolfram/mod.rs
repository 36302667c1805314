//! Wolfram Alpha integration.
//!
//! - [`client`]: the HTTP client and the [`AnswerEngine`] seam
//! - [`resolver`]: the bounded disambiguation loop
//! - [`tool`]: the [`Tool`](crate::tools::Tool) exposed to the model

pub mod client;
pub mod resolver;
pub mod tool;

pub use client::{AnswerEngine, WolframAlphaClient};
pub use resolver::{
    DEFAULT_DEADLINE, DEFAULT_MAX_ATTEMPTS, LookupResult, QueryResolver, ResolutionOutcome,
    Suggestion, best_suggestion, classify,
};
pub use tool::{APPID_FIELD, WolframAlphaTool};
