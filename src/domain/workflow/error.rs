//! Workflow error types

use thiserror::Error;

use super::template::TemplateError;
use crate::domain::llm::CompletionError;

/// Why a single step failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StepError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl StepError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Completion(_) => "completion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_transparent() {
        let err: StepError = CompletionError::empty("Anthropic").into();
        assert_eq!(err.to_string(), "No content in Anthropic response");
        assert_eq!(err.kind(), "completion");

        let err: StepError = TemplateError::MissingVariable {
            name: "x".to_string(),
            available: vec![],
        }
        .into();
        assert_eq!(err.kind(), "template");
        assert!(err.to_string().contains("{{x}}"));
    }
}
