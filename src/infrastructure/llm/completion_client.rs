//! Completion client backed by an LLM provider

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::llm::SYSTEM_INSTRUCTION;
use crate::domain::{
    CompletionClient, CompletionDefaults, CompletionError, CompletionOptions, LlmProvider,
    LlmRequest,
};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

/// Sends each prompt as the only user turn, with the fixed system instruction
#[derive(Debug, Clone)]
pub struct LlmCompletionClient {
    provider: Arc<dyn LlmProvider>,
    defaults: CompletionDefaults,
}

impl LlmCompletionClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_defaults(provider, CompletionDefaults::default())
    }

    pub fn with_defaults(provider: Arc<dyn LlmProvider>, defaults: CompletionDefaults) -> Self {
        Self { provider, defaults }
    }

    pub fn defaults(&self) -> &CompletionDefaults {
        &self.defaults
    }
}

#[async_trait]
impl CompletionClient for LlmCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let (model, temperature, max_tokens) = self.defaults.resolve(options);

        let request = LlmRequest::builder()
            .system(SYSTEM_INSTRUCTION)
            .user(prompt)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build();

        debug!(
            provider = self.provider.provider_name(),
            model = %model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let start = Instant::now();
        let result = self.provider.chat(&model, request).await;

        let usage = result.as_ref().ok().and_then(|r| r.usage.as_ref());
        record_llm_request(LlmRequestMetricParams {
            provider: self.provider.provider_name(),
            model: &model,
            duration: start.elapsed(),
            success: result.is_ok(),
            input_tokens: usage.map(|u| u64::from(u.prompt_tokens)),
            output_tokens: usage.map(|u| u64::from(u.completion_tokens)),
        });

        let response = result?;

        debug!(
            provider = self.provider.provider_name(),
            response_id = %response.id,
            model = %response.model,
            stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
            "Completion received"
        );

        if response.is_truncated() {
            warn!(
                response_id = %response.id,
                max_tokens,
                "Completion truncated at max_tokens"
            );
        }

        Ok(response.message.content().to_string())
    }
}
