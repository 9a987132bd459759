use async_trait::async_trait;
use std::fmt::Debug;

use super::{CompletionError, LlmRequest, LlmResponse};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, CompletionError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
