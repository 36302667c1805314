//! Tool invocation context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::secrets::Credentials;

/// Role of a prior conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for PromptRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        };
        write!(f, "{}", s)
    }
}

/// A message from the conversation leading up to the tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// Everything the dispatcher supplies alongside the tool parameters.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Unique ID for this call, carried in tool log events.
    pub invocation_id: Uuid,
    /// User on whose behalf the tool runs.
    pub user_id: String,
    /// Provider credentials for this user.
    pub credentials: Credentials,
    /// Prior conversation context.
    pub prompt_messages: Vec<PromptMessage>,
}

impl ToolInvocation {
    /// Create a new invocation for a user with no credentials.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            user_id: user_id.into(),
            credentials: Credentials::new(),
            prompt_messages: Vec::new(),
        }
    }

    /// Set the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the prior conversation messages.
    pub fn with_prompt_messages(mut self, messages: Vec<PromptMessage>) -> Self {
        self.prompt_messages = messages;
        self
    }
}

impl Default for ToolInvocation {
    fn default() -> Self {
        Self::new("default")
    }
}
