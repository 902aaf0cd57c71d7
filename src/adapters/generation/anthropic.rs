//! Anthropic provider - messages-API implementation of GenerationProvider.
//!
//! The system instruction travels in the dedicated `system` field; the
//! conversation window becomes alternating user/assistant messages. The
//! messages API requires a non-empty message list opening with a user turn,
//! so a bare instruction gets a minimal user opener.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{GenerationError, GenerationProvider, GenerationRequest, MessageRole};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic messages-API provider.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_api_request(&self, request: &GenerationRequest) -> MessagesRequest {
        let mut messages: Vec<ApiMessage> = request
            .window
            .iter()
            .map(|message| ApiMessage {
                role: match message.role {
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "assistant".to_string(),
                },
                content: message.content.clone(),
            })
            .collect();

        if messages.first().map(|m| m.role.as_str()) != Some("user") {
            messages.insert(
                0,
                ApiMessage {
                    role: "user".to_string(),
                    content: "Hello".to_string(),
                },
            );
        }

        MessagesRequest {
            model: self.config.model.clone(),
            system: request.instruction.clone(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(1024),
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let api_request = self.to_api_request(&request);

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, &response));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(e.to_string()))?;

        let content: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();

        if content.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(content)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

fn classify_transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout { timeout_secs: 60 }
    } else {
        GenerationError::network(error.to_string())
    }
}

fn classify_status(status: StatusCode, response: &reqwest::Response) -> GenerationError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(30);
            GenerationError::RateLimited { retry_after_secs }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::AuthenticationFailed,
        status if status.is_server_error() => {
            GenerationError::unavailable(format!("provider returned {status}"))
        }
        status => GenerationError::network(format!("unexpected status {status}")),
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    system: String,
    messages: Vec<ApiMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Message;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicConfig::new("key")).unwrap()
    }

    #[test]
    fn instruction_goes_into_system_field() {
        let mut request = GenerationRequest::new("Be curious.");
        request.window = vec![Message::user("Hi there.")];
        let api_request = provider().to_api_request(&request);

        assert_eq!(api_request.system, "Be curious.");
        assert_eq!(api_request.messages.len(), 1);
        assert_eq!(api_request.messages[0].role, "user");
    }

    #[test]
    fn window_opening_with_assistant_gets_user_opener() {
        let mut request = GenerationRequest::new("i");
        request.window = vec![Message::assistant("First question?")];
        let api_request = provider().to_api_request(&request);

        assert_eq!(api_request.messages[0].role, "user");
        assert_eq!(api_request.messages[1].role, "assistant");
    }

    #[test]
    fn empty_window_gets_user_opener() {
        let request = GenerationRequest::new("i");
        let api_request = provider().to_api_request(&request);
        assert_eq!(api_request.messages.len(), 1);
        assert_eq!(api_request.messages[0].role, "user");
    }

    #[test]
    fn max_tokens_defaults_when_unset() {
        let request = GenerationRequest::new("i");
        assert_eq!(provider().to_api_request(&request).max_tokens, 1024);

        let bounded = GenerationRequest::new("i").with_max_tokens(300);
        assert_eq!(provider().to_api_request(&bounded).max_tokens, 300);
    }
}
