//! LLM provider domain models and traits

mod completion;
mod error;
mod message;
mod provider;
mod request;
mod response;

pub use completion::{
    CompletionClient, CompletionDefaults, CompletionOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, SYSTEM_INSTRUCTION,
};
pub use error::CompletionError;
pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};
pub use response::{LlmResponse, Usage};

#[cfg(test)]
pub use completion::MockCompletionClient;
#[cfg(test)]
pub use provider::mock::MockLlmProvider;
