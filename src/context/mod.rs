//! Per-call context handed to tools by the dispatcher.

mod invocation;

pub use invocation::{PromptMessage, PromptRole, ToolInvocation};
