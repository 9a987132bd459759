//! Workflow step type definitions

use serde::{Deserialize, Serialize};

use crate::domain::llm::CompletionOptions;

/// What a step does, tagged by the `type` field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Render a template and send it to the completion provider
    Prompt(PromptStep),
}

impl StepAction {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Prompt(_) => "prompt",
        }
    }
}

/// Prompt step configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptStep {
    /// Text with `{{name}}` placeholders
    pub template: String,

    /// Optional model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Optional temperature override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Optional max tokens override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl PromptStep {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            model: None,
            temperature: None,
            max_tokens: None,
        }
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

    /// Per-call overrides for the completion client
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
