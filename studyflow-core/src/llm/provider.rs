//! Completion provider abstraction.
//!
//! One seam covers any chat-completion backend: a request is an ordered
//! list of role-tagged messages plus a model id, and a completion is the
//! extracted text of the best choice alongside the provider's raw payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role tag for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Single role-tagged message in a completion exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request forwarded to a completion provider.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Extracted text of the best completion choice plus the provider's
/// untouched response.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub raw: Value,
}

/// Completion transport and request errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Chat-completion backend seam.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// Send one completion request. No retries happen at this layer;
    /// transport and provider failures propagate to the caller.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;

    /// Reject requests no provider can serve.
    fn validate_request(&self, request: &CompletionRequest) -> Result<(), LlmError> {
        if request.model.is_empty() {
            return Err(LlmError::InvalidRequest("model id is empty".to_string()));
        }
        if request.messages.is_empty() {
            return Err(LlmError::InvalidRequest(
                "messages must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}
