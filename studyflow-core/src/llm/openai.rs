use super::provider::{Completion, CompletionProvider, CompletionRequest, LlmError};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAIProvider {
    api_key: String,
    http_client: HttpClient,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a non-default endpoint root, e.g. a proxy or a
    /// self-hosted OpenAI-compatible server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            http_client: HttpClient::new(),
            base_url,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.validate_request(&request)?;

        let body = json!({
            "model": request.model,
            "messages": request.messages,
        });

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider(format!("HTTP {status}: {error_text}")));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Provider(e.to_string()))?;

        let text = extract_choice_text(&raw);
        Ok(Completion { text, raw })
    }
}

/// Pull the text out of the first returned choice.
///
/// `message.content` arrives either as a scalar string or as an ordered
/// list of typed segments; only `"text"` segments contribute, joined by
/// newline in their original order. Absent content yields an empty string.
pub(crate) fn extract_choice_text(raw: &Value) -> String {
    match &raw["choices"][0]["message"]["content"] {
        Value::String(text) => text.clone(),
        Value::Array(segments) => segments
            .iter()
            .filter(|segment| segment["type"] == "text")
            .filter_map(|segment| segment["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
