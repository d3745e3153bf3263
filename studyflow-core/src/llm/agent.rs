use std::sync::Arc;

use super::provider::{CompletionProvider, CompletionRequest, LlmError, Message};

/// A reusable binding of completion provider, model id, and fixed system
/// prompt.
///
/// Each call builds the two-message `[system, user]` exchange and returns
/// the extracted completion text. Stateless beyond the binding, so one
/// agent can serve unrelated requests concurrently.
pub struct Agent {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    system_prompt: String,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Run one exchange against the bound model and return the generated
    /// text.
    pub async fn generate(&self, user_prompt: &str) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(self.system_prompt.clone()),
                Message::user(user_prompt),
            ],
        };

        let completion = self.provider.complete(request).await?;
        Ok(completion.text)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
