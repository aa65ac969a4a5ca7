// Configuration layer for creating LLM clients from a credential read at call time

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::openrouter::{OpenRouterClient, DEFAULT_REFERER, OPENROUTER_API_BASE};

/// Where and how to reach the completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://openrouter.ai/api/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Value sent as `HTTP-Referer` to identify the calling app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

impl ProviderConfig {
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            referer: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(OPENROUTER_API_BASE)
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create an LLM client from provider configuration
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn crate::traits::LLMClient>> {
        let client = OpenRouterClient::with_endpoint(
            config.api_key.clone(),
            config.base_url(),
            config.referer.as_deref().unwrap_or(DEFAULT_REFERER),
        )?;
        Ok(Arc::new(client))
    }
}
