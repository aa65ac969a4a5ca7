// OpenRouter client (OpenAI-compatible chat completions + model catalog)

use crate::traits::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, LLMClient, ModelCatalogClient, ModelInfo,
    TokenUsage,
};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_REFERER: &str = "http://localhost";

/// OpenRouter client (HTTP direct, no SDK)
///
/// No request timeout is configured: each call is a single best-effort attempt.
pub struct OpenRouterClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(api_key, OPENROUTER_API_BASE, DEFAULT_REFERER)
    }

    /// Create a client against a custom base URL, identifying the app with `referer`
    pub fn with_endpoint(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        referer: impl AsRef<str>,
    ) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(referer.as_ref()).context("Invalid referer")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<Value> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": serde_json::to_value(messages)?,
        });

        if let Some(obj) = request.as_object_mut() {
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
        }

        Ok(request)
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request.model, &request.messages, &request.options)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("OpenRouter API error ({}): {}", status, error_text);
            anyhow::bail!("OpenRouter API error ({}): {}", status, error_text);
        }

        let raw: OpenRouterChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        // Convert to provider-agnostic response
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

#[async_trait]
impl ModelCatalogClient for OpenRouterClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Failed to fetch models: {}", status);
            anyhow::bail!("Failed to fetch models ({})", status);
        }

        let catalog: ModelsResponse = response
            .json()
            .await
            .context("Failed to parse model list")?;

        let models = catalog.data.unwrap_or_default();
        tracing::debug!(count = models.len(), "OpenRouter models fetched");
        Ok(models)
    }
}

impl LLMClient for OpenRouterClient {}

// ============================================================================
// OPENROUTER-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenRouterChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Option<Vec<ModelInfo>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_omits_unset_options() {
        let client = OpenRouterClient::new("sk-test").unwrap();
        let payload = client
            .build_chat_request("gpt-3.5-turbo", &[Message::human("hi")], &ChatOptions::default())
            .unwrap();

        assert_eq!(payload["model"], "gpt-3.5-turbo");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert!(payload.get("temperature").is_none());
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn test_payload_includes_set_options() {
        let client = OpenRouterClient::new("sk-test").unwrap();
        let options = ChatOptions::new().temperature(0.7).max_tokens(2000);
        let payload = client.build_chat_request("m", &[], &options).unwrap();

        assert_eq!(payload["max_tokens"], 2000);
        assert!(payload.get("temperature").is_some());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenRouterClient::with_endpoint("k", "http://127.0.0.1:9/api/", "http://app").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(OpenRouterClient::new("bad\nkey").is_err());
    }
}
