//! LLM provider implementations

mod anthropic;
mod completion_client;
mod factory;
mod http_client;

pub use anthropic::{AnthropicProvider, DEFAULT_ANTHROPIC_BASE_URL};
pub use completion_client::LlmCompletionClient;
pub use factory::LlmProviderFactory;
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
