//! Builds the completion stack from configuration

use std::sync::Arc;

use super::anthropic::AnthropicProvider;
use super::completion_client::LlmCompletionClient;
use super::http_client::HttpClient;
use crate::config::ProviderConfig;
use crate::domain::{CompletionClient, CompletionDefaults, DomainError, LlmProvider};

/// Factory for creating LLM providers and completion clients
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Anthropic provider over a reqwest client bounded by the configured timeout
    pub fn create_anthropic(
        api_key: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let client = HttpClient::with_timeout(config.timeout()).map_err(|e| {
            DomainError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Arc::new(AnthropicProvider::with_base_url(
            client,
            api_key,
            config.base_url.as_str(),
        )))
    }

    /// `Ok(None)` when no credential is configured
    pub fn create_completion_client(
        config: &ProviderConfig,
    ) -> Result<Option<Arc<dyn CompletionClient>>, DomainError> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let provider = Self::create_anthropic(api_key, config)?;
        let defaults = CompletionDefaults::default().with_model(config.model.as_str());

        Ok(Some(Arc::new(LlmCompletionClient::with_defaults(
            provider, defaults,
        ))))
    }
}
