//! Completion error types

use thiserror::Error;

/// Errors raised by a completion provider call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompletionError {
    /// The provider answered with a non-success status
    #[error("{provider} API error: {status} - {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect failure, timeout)
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("Failed to parse {provider} response: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("No content in {provider} response")]
    EmptyResponse { provider: String },
}

impl CompletionError {
    pub fn status(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn empty(provider: impl Into<String>) -> Self {
        Self::EmptyResponse {
            provider: provider.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompletionError::status("Anthropic", 401, r#"{"error":"invalid x-api-key"}"#);
        assert_eq!(
            err.to_string(),
            r#"Anthropic API error: 401 - {"error":"invalid x-api-key"}"#
        );

        let err = CompletionError::empty("Anthropic");
        assert_eq!(err.to_string(), "No content in Anthropic response");
    }
}
