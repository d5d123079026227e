//! OpenAiChatClient - text generation over an OpenAI-compatible REST API.
//!
//! Calls `{base_url}/chat/completions` with bearer authentication. Transport
//! and HTTP failures are mapped onto [`GenerationError`] so the conversation
//! engine can decide how to recover.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};

use pitchdesk_core::PitchdeskError;
use pitchdesk_core::config::LlmConfig;
use pitchdesk_core::generation::{ChatMessage, GenerationError, GenerationRequest, TextGenerator};

/// [`TextGenerator`] backed by the OpenAI chat completions wire format.
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChatClient {
    /// Creates a client with the given key, endpoint and request timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PitchdeskError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PitchdeskError::config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Builds a client from the `[llm]` configuration section.
    ///
    /// A missing or blank API key is a configuration error.
    pub fn from_config(config: &LlmConfig) -> Result<Self, PitchdeskError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PitchdeskError::config(
                    "LLM API key not found in config.toml [llm] or LLM_API_KEY",
                )
            })?;

        Self::new(api_key, &config.base_url, &config.model, config.timeout())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            GenerationError::Unexpected(format!("failed to parse chat completion: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        };

        let text = self.send_request(&body).await?;
        tracing::debug!(model = %self.model, chars = text.len(), "chat completion received");
        Ok(text)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn map_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else if err.is_connect() {
        GenerationError::ConnectionFailed(err.to_string())
    } else {
        GenerationError::Unexpected(format!("chat completion request failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: &str, retry_after: Option<Duration>) -> GenerationError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return GenerationError::RateLimited { retry_after };
    }
    if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
        return GenerationError::Timeout;
    }

    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    GenerationError::Unexpected(format!("HTTP {}: {}", status.as_u16(), message))
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchdesk_core::generation::GenerationParams;

    fn response(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_text_trims_content() {
        let parsed = response(r#"{"choices":[{"message":{"content":"  Привет!\n"}}]}"#);
        assert_eq!(extract_text_response(parsed).unwrap(), "Привет!");
    }

    #[test]
    fn test_extract_text_rejects_missing_content() {
        let parsed = response(r#"{"choices":[{"message":{"content":null}}]}"#);
        assert_eq!(
            extract_text_response(parsed).unwrap_err(),
            GenerationError::EmptyResponse
        );

        let parsed = response(r#"{"choices":[]}"#);
        assert_eq!(
            extract_text_response(parsed).unwrap_err(),
            GenerationError::EmptyResponse
        );
    }

    #[test]
    fn test_rate_limit_keeps_retry_after() {
        let header = HeaderValue::from_static("12");
        let retry_after = parse_retry_after(Some(&header));
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, "", retry_after);
        assert_eq!(
            err,
            GenerationError::RateLimited {
                retry_after: Some(Duration::from_secs(12))
            }
        );
    }

    #[test]
    fn test_http_error_uses_provider_message() {
        let body = r#"{"error":{"message":"invalid model","type":"invalid_request_error"}}"#;
        let err = map_http_error(StatusCode::BAD_REQUEST, body, None);
        assert_eq!(
            err,
            GenerationError::Unexpected("HTTP 400: invalid model".to_string())
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerationRequest::single_turn("system prompt", "hello")
            .with_params(GenerationParams::default().with_temperature(0.8));
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = LlmConfig::default();
        let err = OpenAiChatClient::from_config(&config).err().unwrap();
        assert!(err.is_config());

        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            base_url: "http://localhost:8080/v1/".into(),
            ..LlmConfig::default()
        };
        let client = OpenAiChatClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
