//! Pluggable tool adapters for LLM agents.
//!
//! Each tool wraps one external action and hands a short text or link
//! message back to the model:
//!
//! ```text
//!  dispatcher ──(params, credentials, context)──▶ ToolRegistry
//!                                                   │
//!         ┌──────────────────┬──────────────────────┼─────────────────────┐
//!         ▼                  ▼                      ▼                     │
//!   WolframAlphaTool   CurrentTimeTool          ApiTool (per registered   │
//!         │                                     operation, via            │
//!   QueryResolver ──▶ AnswerEngine              ProviderRepository)       │
//!   (bounded "did you mean" refinement)                                   │
//!         └──────────────────────── ToolOutput { Text | Link } ◀──────────┘
//! ```
//!
//! # Features
//!
//! - **Wolfram Alpha** - disambiguates queries by following the highest
//!   scored suggestion, under an attempt cap and a per-call deadline
//! - **Time** - current time in UTC or a fixed offset
//! - **Registered APIs** - user and tenant HTTP operations become tools

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod secrets;
pub mod testing;
pub mod tools;

pub use config::Config;
pub use error::{Error, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::{PromptMessage, ToolInvocation};
    pub use crate::error::{Error, Result};
    pub use crate::secrets::Credentials;
    pub use crate::tools::wolfram::{QueryResolver, ResolutionOutcome};
    pub use crate::tools::{Tool, ToolError, ToolMessage, ToolOutput, ToolRegistry};
}
