//! LLM abstraction layer.
//!
//! A provider seam for chat-completion backends plus the [`Agent`]
//! binding of provider, model, and fixed system prompt that the
//! orchestration service drives.

pub mod agent;
pub mod openai;
pub mod provider;

pub use agent::Agent;
pub use openai::OpenAIProvider;
pub use provider::{
    Completion, CompletionProvider, CompletionRequest, LlmError, Message, MessageRole,
};
