use parley_llm::{ChatRequest, ClientFactory, LLMClient, Message as ProviderMessage, ProviderConfig};
use parley_persist::Settings;
use parley_types::{Message, Role};
use std::sync::Arc;

use crate::error::{ChatError, Result};

/// Provider message list for a thread: the system prompt first, even when
/// empty, then the history in order.
pub fn build_provider_messages(system_prompt: &str, history: &[Message]) -> Vec<ProviderMessage> {
    std::iter::once(ProviderMessage::system(system_prompt))
        .chain(history.iter().map(|message| match message.role {
            Role::User => ProviderMessage::human(message.content.as_str()),
            Role::Assistant => ProviderMessage::ai(message.content.as_str()),
        }))
        .collect()
}

/// Sends a thread's history to the completion provider.
///
/// Credentials and the system prompt are read from [`Settings`] on every
/// call, so a key saved mid-session is picked up by the next send.
#[derive(Debug, Clone)]
pub struct CompletionGateway {
    settings: Settings,
    base_url: Option<String>,
    referer: Option<String>,
}

impl CompletionGateway {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
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

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// OpenRouter key, or `MissingCredential` when absent or empty
    pub fn credential(&self) -> Result<String> {
        self.settings
            .openrouter_key()?
            .ok_or(ChatError::MissingCredential)
    }

    /// Client bound to the current credential. Fails before any network
    /// activity when no credential is stored.
    pub fn client(&self) -> Result<Arc<dyn LLMClient>> {
        let mut config = ProviderConfig::openrouter(self.credential()?);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(referer) = &self.referer {
            config = config.with_referer(referer.clone());
        }
        ClientFactory::create_client(config).map_err(ChatError::Completion)
    }

    /// Ask the provider for the next assistant reply to `history`
    pub async fn complete(&self, model: &str, history: &[Message]) -> Result<String> {
        let client = self.client()?;
        let system_prompt = self.settings.system_prompt()?;
        let messages = build_provider_messages(&system_prompt, history);

        tracing::info!(model, messages = messages.len(), "Sending completion request");

        let response = client
            .chat(ChatRequest::new(model, messages))
            .await
            .map_err(ChatError::Completion)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Completion usage"
            );
        }

        response.content.ok_or(ChatError::MalformedResponse)
    }
}
