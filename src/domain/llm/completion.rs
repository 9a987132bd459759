//! Completion client contract
//!
//! A completion client turns one rendered prompt into one piece of generated
//! text. Workflow steps only ever talk to this trait.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::CompletionError;

/// Model used when neither the step nor the deployment names one
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// System instruction sent with every completion
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Respond clearly and concisely.";

/// Per-call overrides; unset fields fall back to the client defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Engine-wide fallbacks for completion parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionDefaults {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl CompletionDefaults {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Resolve the effective parameters for one call
    pub fn resolve(&self, options: &CompletionOptions) -> (String, f64, u32) {
        (
            options.model.clone().unwrap_or_else(|| self.model.clone()),
            options.temperature.unwrap_or(self.temperature),
            options.max_tokens.unwrap_or(self.max_tokens),
        )
    }
}

/// Single-shot text completion
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for `prompt`, sent as the sole user turn
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;
}
