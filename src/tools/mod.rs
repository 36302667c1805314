//! Pluggable tool system.
//!
//! Tools are the model's interface to the outside world. Each one wraps a
//! single external action:
//! - Answer questions through Wolfram Alpha
//! - Report the current time
//! - Call an HTTP API a user or tenant registered

pub mod builtin;
pub mod provider;
pub mod wolfram;

mod registry;
mod tool;

pub use provider::{ProviderKind, ProviderScope, ToolProvider};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolError, ToolMessage, ToolOutput, ToolSchema, optional_str, require_str};
