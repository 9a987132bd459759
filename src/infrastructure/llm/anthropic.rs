use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::{HttpClientTrait, HttpError};
use crate::domain::{
    CompletionError, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Name used in error messages
const PROVIDER_LABEL: &str = "Anthropic";

/// Anthropic Messages API provider
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let (system, messages) = split_system_messages(&request.messages);

        let anthropic_messages: Vec<AnthropicMessage> = messages
            .iter()
            .map(|m| AnthropicMessage::from_domain(m))
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": anthropic_messages,
            "max_tokens": request.max_tokens.unwrap_or(4096),
        });

        if let Some(system_content) = system {
            body["system"] = serde_json::json!(system_content);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("content-type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, CompletionError> {
        let response: AnthropicResponse = serde_json::from_value(json)
            .map_err(|e| CompletionError::malformed(PROVIDER_LABEL, e.to_string()))?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if content.is_empty() {
            return Err(CompletionError::empty(PROVIDER_LABEL));
        }

        let mut llm_response =
            LlmResponse::new(response.id, response.model, Message::assistant(content));

        if let Some(reason) = response.stop_reason {
            llm_response = llm_response.with_stop_reason(reason);
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.input_tokens, usage.output_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, CompletionError> {
        let url = self.messages_url();
        let body = self.build_request(model, &request);
        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(into_completion_error)?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

fn into_completion_error(error: HttpError) -> CompletionError {
    match error {
        HttpError::Status { status, body } => CompletionError::status(PROVIDER_LABEL, status, body),
        HttpError::Transport(message) => CompletionError::transport(PROVIDER_LABEL, message),
        HttpError::Decode(message) => CompletionError::malformed(PROVIDER_LABEL, message),
    }
}

/// Anthropic takes system text as a top-level field, not as a message
fn split_system_messages(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let mut system_content = String::new();
    let mut other_messages = Vec::new();

    for msg in messages {
        if msg.role == MessageRole::System {
            if !system_content.is_empty() {
                system_content.push('\n');
            }
            system_content.push_str(msg.content());
        } else {
            other_messages.push(msg);
        }
    }

    let system = if system_content.is_empty() {
        None
    } else {
        Some(system_content)
    };

    (system, other_messages)
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

impl AnthropicMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User | MessageRole::System => "user",
            MessageRole::Assistant => "assistant",
        };

        Self {
            role: role.to_string(),
            content: message.content().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use serde_json::json;

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    fn message_response(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-6",
            "content": [{"type": "text", "text": text}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 10}
        })
    }

    #[tokio::test]
    async fn test_anthropic_chat() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, message_response("Hello! How can I assist you today?"));

        let provider = AnthropicProvider::new(client, "test-api-key");

        let request = LlmRequest::builder()
            .system("You are helpful")
            .user("Hello!")
            .build();

        let response = provider.chat("claude-sonnet-4-6", request).await.unwrap();

        assert_eq!(response.id, "msg_123");
        assert_eq!(response.content(), "Hello! How can I assist you today?");
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
        assert_eq!(response.usage, Some(Usage::new(12, 10)));
    }

    #[tokio::test]
    async fn test_request_body_shape() {
        let client = MockHttpClient::new().with_response(TEST_URL, message_response("ok"));
        let provider = AnthropicProvider::new(client, "test-key");

        let request = LlmRequest::builder()
            .system("System prompt 1")
            .system("System prompt 2")
            .user("Hello")
            .temperature(0.5)
            .max_tokens(1024)
            .build();

        provider.chat("claude-sonnet-4-6", request).await.unwrap();

        let body = provider.client.last_body().unwrap();
        assert_eq!(body["model"], "claude-sonnet-4-6");
        assert_eq!(body["system"], "System prompt 1\nSystem prompt 2");
        assert_eq!(body["messages"], json!([{"role": "user", "content": "Hello"}]));
        assert_eq!(body["temperature"], json!(0.5));
        assert_eq!(body["max_tokens"], 1024);
    }

    #[tokio::test]
    async fn test_temperature_is_sent_exactly() {
        let client = MockHttpClient::new().with_response(TEST_URL, message_response("ok"));
        let provider = AnthropicProvider::new(client, "k");

        let request = LlmRequest::builder().user("hi").temperature(0.7).build();
        provider.chat("m", request).await.unwrap();

        let body = provider.client.last_body().unwrap();
        assert_eq!(body["temperature"], json!(0.7));
        assert_eq!(body["temperature"].as_f64(), Some(0.7));
    }

    #[tokio::test]
    async fn test_text_blocks_are_concatenated() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            json!({
                "id": "msg_1",
                "model": "claude-sonnet-4-6",
                "content": [
                    {"type": "text", "text": "Hello, "},
                    {"type": "tool_use", "id": "t"},
                    {"type": "text", "text": "world"}
                ],
                "stop_reason": "max_tokens"
            }),
        );
        let provider = AnthropicProvider::new(client, "k");

        let response = provider
            .chat("m", LlmRequest::builder().user("hi").build())
            .await
            .unwrap();

        assert_eq!(response.content(), "Hello, world");
        assert!(response.is_truncated());
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn test_empty_content_is_an_error() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            json!({"id": "msg_1", "model": "m", "content": [], "stop_reason": "end_turn"}),
        );
        let provider = AnthropicProvider::new(client, "k");

        let err = provider
            .chat("m", LlmRequest::builder().user("hi").build())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No content in Anthropic response");
    }

    #[tokio::test]
    async fn test_status_error_mapping() {
        let client = MockHttpClient::new().with_error(
            TEST_URL,
            HttpError::Status {
                status: 401,
                body: "invalid x-api-key".to_string(),
            },
        );
        let provider = AnthropicProvider::new(client, "invalid-key");

        let err = provider
            .chat("m", LlmRequest::builder().user("hi").build())
            .await
            .unwrap_err();

        assert_eq!(err, CompletionError::status("Anthropic", 401, "invalid x-api-key"));
        assert_eq!(err.to_string(), "Anthropic API error: 401 - invalid x-api-key");
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({"unexpected": true}));
        let provider = AnthropicProvider::new(client, "k");

        let err = provider
            .chat("m", LlmRequest::builder().user("hi").build())
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_anthropic_custom_base_url() {
        let custom_url = "http://localhost:8081/v1/messages";
        let client = MockHttpClient::new().with_response(custom_url, message_response("Custom"));
        let provider =
            AnthropicProvider::with_base_url(client, "test-key", "http://localhost:8081/");

        let response = provider
            .chat("m", LlmRequest::builder().user("Test").build())
            .await
            .unwrap();

        assert_eq!(response.content(), "Custom");
    }
}
