// =============================================================================
// ANTHROPIC CLIENT - Anthropic Messages API Integration
// =============================================================================
//
// Implementation of the `CompletionProvider` trait against the Anthropic
// Messages API (https://docs.anthropic.com/en/api/messages).
//
// **Wire format notes:**
// - Authentication: API key goes in the `x-api-key` header (not a Bearer
//   token), together with a pinned `anthropic-version` header.
// - Request body: `model`, `max_tokens`, `temperature`, `messages[]` with
//   role-tagged entries.
// - Response: reply text lives at `content[0].text`.
//
// One outbound call per invocation; no retries, no caching.

use crate::core::ai::{AiMessage, CompletionConfig, CompletionProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint (used by tests and proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(
        &self,
        messages: &[AiMessage],
        config: &CompletionConfig,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);

        let payload = json!({
            "model": config.model,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "messages": messages,
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Anthropic API error: {} - {}",
                status, text
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        // Extract the first text segment of the reply.
        body["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::Envelope("missing content[0].text in reply".to_string())
            })
    }
}
