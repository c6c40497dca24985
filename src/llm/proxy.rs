//! Failure-swallowing front for the configured LLM provider

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::conversation::ChatTurn;
use crate::llm::provider::{create_provider, LlmProvider};

const PROMPT_PREFIX: &str = "You are a helpful assistant answering a user's question. \
                             Please provide a concise response to: ";

/// Single configured provider; every failure becomes `None`
pub struct LlmProxy {
    provider: Box<dyn LlmProvider>,
}

impl LlmProxy {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Build the proxy for `config.default_provider`, or `None` when the LLM
    /// is disabled or the provider cannot be created.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.llm_enabled {
            return None;
        }

        let name = &config.default_provider;
        let Some(provider_config) = config.providers.get(name) else {
            warn!("LLM provider {} is not configured", name);
            return None;
        };
        if !provider_config.enabled {
            warn!("LLM provider {} is disabled", name);
            return None;
        }

        match create_provider(name, provider_config.clone(), config.resolve_api_key(name)) {
            Ok(provider) => Some(Self::new(provider)),
            Err(e) => {
                warn!("Failed to create LLM provider {}: {}", name, e);
                None
            }
        }
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// Ask the provider. Errors and blank replies yield `None`.
    pub async fn ask(&self, prompt: &str, history: &[ChatTurn]) -> Option<String> {
        if prompt.trim().is_empty() {
            return None;
        }

        let enhanced = format!("{}{}", PROMPT_PREFIX, prompt);
        match self.provider.generate(&enhanced, history).await {
            Ok(reply) if !reply.trim().is_empty() => {
                debug!("{} response generated ({} chars)", self.provider.name(), reply.len());
                Some(reply)
            }
            Ok(_) => {
                warn!("{} returned an empty response", self.provider.name());
                None
            }
            Err(e) => {
                error!("Error getting {} response: {}", self.provider.name(), e);
                None
            }
        }
    }
}
