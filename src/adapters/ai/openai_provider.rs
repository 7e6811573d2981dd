//! OpenAI Provider - Implementation of AIProvider for chat-completions APIs.
//!
//! Speaks the OpenAI chat-completions wire format against either the public
//! OpenAI API (bearer auth) or an Azure OpenAI deployment (`api-key` header,
//! deployment-scoped URL with an `api-version` query parameter).
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let azure = OpenAIConfig::azure(api_key, "https://my-resource.openai.azure.com", "gpt-4o")
//!     .with_api_version("2024-02-15-preview");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! Retries are not performed here; wrap the provider in `RetryingProvider`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Which flavour of the chat-completions API to target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAIEndpoint {
    /// `{base_url}/chat/completions` with `Authorization: Bearer`.
    OpenAI { base_url: String },
    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
    /// with an `api-key` header.
    Azure {
        endpoint: String,
        deployment: String,
        api_version: String,
    },
}

/// Configuration for the chat-completions provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model name sent in the request body.
    pub model: String,
    pub endpoint: OpenAIEndpoint,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a configuration for the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            endpoint: OpenAIEndpoint::OpenAI {
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            },
            timeout: Duration::from_secs(60),
        }
    }

    /// Creates a configuration for an Azure OpenAI deployment.
    ///
    /// The deployment name doubles as the model name.
    pub fn azure(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        let deployment = deployment.into();
        Self {
            api_key: Secret::new(api_key.into()),
            model: deployment.clone(),
            endpoint: OpenAIEndpoint::Azure {
                endpoint: endpoint.into(),
                deployment,
                api_version: DEFAULT_AZURE_API_VERSION.to_string(),
            },
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL. Ignored for Azure endpoints.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        if let OpenAIEndpoint::OpenAI { base_url } = &mut self.endpoint {
            *base_url = url.into();
        }
        self
    }

    /// Sets the Azure API version. Ignored for plain OpenAI.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        if let OpenAIEndpoint::Azure { api_version, .. } = &mut self.endpoint {
            *api_version = version.into();
        }
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

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        match &self.endpoint {
            OpenAIEndpoint::OpenAI { base_url } => {
                format!("{}/chat/completions", base_url.trim_end_matches('/'))
            }
            OpenAIEndpoint::Azure {
                endpoint,
                deployment,
                api_version,
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                deployment,
                api_version
            ),
        }
    }

    fn provider_name(&self) -> &'static str {
        match self.endpoint {
            OpenAIEndpoint::OpenAI { .. } => "openai",
            OpenAIEndpoint::Azure { .. } => "azure",
        }
    }
}

/// Chat-completions provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Converts our request to the chat-completions format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.endpoint {
            OpenAIEndpoint::OpenAI { .. } => {
                builder.header("Authorization", format!("Bearer {}", self.config.api_key()))
            }
            OpenAIEndpoint::Azure { .. } => builder.header("api-key", self.config.api_key()),
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let body = self.to_openai_request(request);

        self.authorize(self.client.post(self.config.completions_url()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after_header(response.headers());
        let error_body = response.text().await.unwrap_or_default();
        Err(classify_error(status, retry_after, &error_body))
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| AIError::network(format!("Failed to read response: {}", e)))?;
        parse_completion(&body)
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        tracing::debug!(
            provider = self.config.provider_name(),
            purpose = %request.metadata.purpose,
            trace_id = %request.metadata.trace_id,
            "sending chat completion"
        );
        let response = self.send_request(&request).await?;
        let completion = self.parse_response(response).await?;
        tracing::debug!(
            trace_id = %request.metadata.trace_id,
            model = %completion.model,
            finish_reason = ?completion.finish_reason,
            total_tokens = completion.usage.total_tokens,
            "chat completion received"
        );
        Ok(completion)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new(self.config.provider_name(), self.config.model.clone())
    }
}

/// Maps a non-success HTTP status and body to an error.
///
/// 429 and any overload signal map to retryable variants.
fn classify_error(status: StatusCode, retry_after: Option<u32>, body: &str) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(
            retry_after
                .or_else(|| parse_retry_after_body(body))
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        ),
        400 => {
            if body.contains("maximum context length") || body.contains("context_length_exceeded")
            {
                AIError::context_too_long(error_message(body))
            } else if body.contains("content_filter") {
                AIError::content_filtered(error_message(body))
            } else {
                AIError::InvalidRequest(error_message(body))
            }
        }
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ if body.to_ascii_lowercase().contains("overloaded") => {
            AIError::unavailable(format!("Provider overloaded ({}): {}", status, body))
        }
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

fn parse_retry_after_header(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u32>()
        .ok()
}

/// Looks for a "try again in Ns" hint in the error message.
fn parse_retry_after_body(body: &str) -> Option<u32> {
    let message = error_message(body);
    let idx = message.find("try again in ")?;
    let rest = &message[idx + "try again in ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Extracts `error.message` from an error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<OpenAIErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.to_string())
}

fn parse_completion(body: &str) -> Result<CompletionResponse, AIError> {
    let parsed: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("stop") | None => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some(_) => FinishReason::Error,
    };

    if finish_reason == FinishReason::ContentFilter {
        return Err(AIError::content_filtered("completion stopped by content filter"));
    }

    let usage = parsed
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_else(TokenUsage::zero);

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        usage,
        model: parsed.model,
        finish_reason,
    })
}

// ----- Chat Completions API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{RequestMetadata, RequestPurpose};

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(SessionId::new(), RequestPurpose::Reply))
            .with_system_prompt("You are a travel assistant.")
            .with_message(MessageRole::User, "Plan my trip")
            .with_max_tokens(150)
            .with_temperature(0.7)
    }

    mod config {
        use super::*;

        #[test]
        fn openai_url_uses_base_url() {
            let config = OpenAIConfig::new("key").with_base_url("https://proxy.local/v1/");
            assert_eq!(
                config.completions_url(),
                "https://proxy.local/v1/chat/completions"
            );
            assert_eq!(config.provider_name(), "openai");
        }

        #[test]
        fn azure_url_is_deployment_scoped() {
            let config = OpenAIConfig::azure("key", "https://trips.openai.azure.com/", "gpt-4o")
                .with_api_version("2024-06-01");
            assert_eq!(
                config.completions_url(),
                "https://trips.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
            );
            assert_eq!(config.model, "gpt-4o");
            assert_eq!(config.provider_name(), "azure");
        }

        #[test]
        fn base_url_does_not_touch_azure() {
            let config = OpenAIConfig::azure("key", "https://a.azure.com", "dep")
                .with_base_url("https://ignored");
            assert!(matches!(config.endpoint, OpenAIEndpoint::Azure { .. }));
        }

        #[test]
        fn api_key_is_not_in_debug_output() {
            let config = OpenAIConfig::new("sk-very-secret");
            assert!(!format!("{:?}", config).contains("sk-very-secret"));
            assert_eq!(config.api_key(), "sk-very-secret");
        }
    }

    mod request_conversion {
        use super::*;

        #[test]
        fn system_prompt_goes_first() {
            let provider = OpenAIProvider::new(OpenAIConfig::new("key")).unwrap();
            let body = provider.to_openai_request(&request());

            assert_eq!(body.messages.len(), 2);
            assert_eq!(body.messages[0].role, "system");
            assert_eq!(body.messages[1].role, "user");
            assert_eq!(body.messages[1].content, "Plan my trip");
            assert_eq!(body.max_tokens, Some(150));
        }

        #[test]
        fn optional_fields_are_omitted() {
            let provider = OpenAIProvider::new(OpenAIConfig::new("key")).unwrap();
            let bare = CompletionRequest::new(RequestMetadata::new(
                SessionId::new(),
                RequestPurpose::Synthesis,
            ));
            let json = serde_json::to_value(provider.to_openai_request(&bare)).unwrap();
            assert!(json.get("max_tokens").is_none());
            assert!(json.get("temperature").is_none());
        }
    }

    mod error_mapping {
        use super::*;

        #[test]
        fn rate_limit_prefers_header() {
            let err = classify_error(StatusCode::TOO_MANY_REQUESTS, Some(7), "{}");
            assert!(matches!(err, AIError::RateLimited { retry_after_secs: 7 }));
            assert!(err.is_retryable());
        }

        #[test]
        fn rate_limit_reads_hint_from_body() {
            let body = r#"{"error":{"message":"Rate limit reached. Please try again in 12s."}}"#;
            let err = classify_error(StatusCode::TOO_MANY_REQUESTS, None, body);
            assert!(matches!(err, AIError::RateLimited { retry_after_secs: 12 }));
        }

        #[test]
        fn server_errors_are_retryable() {
            let err = classify_error(StatusCode::SERVICE_UNAVAILABLE, None, "busy");
            assert!(matches!(err, AIError::Unavailable { .. }));
            assert!(err.is_retryable());
        }

        #[test]
        fn overloaded_body_is_retryable() {
            let err = classify_error(StatusCode::from_u16(409).unwrap(), None, "Model overloaded");
            assert!(err.is_retryable());
        }

        #[test]
        fn auth_and_bad_request_are_terminal() {
            assert!(!classify_error(StatusCode::UNAUTHORIZED, None, "").is_retryable());
            let err = classify_error(
                StatusCode::BAD_REQUEST,
                None,
                r#"{"error":{"message":"bad field"}}"#,
            );
            assert!(matches!(err, AIError::InvalidRequest(ref m) if m == "bad field"));
        }

        #[test]
        fn context_length_is_detected() {
            let body = r#"{"error":{"message":"maximum context length is 8192 tokens"}}"#;
            let err = classify_error(StatusCode::BAD_REQUEST, None, body);
            assert!(matches!(err, AIError::ContextTooLong { .. }));
        }
    }

    mod response_parsing {
        use super::*;

        #[test]
        fn parses_first_choice_and_usage() {
            let body = r#"{
                "model": "gpt-4o-mini",
                "choices": [{"message": {"role": "assistant", "content": "Where to?"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24}
            }"#;
            let response = parse_completion(body).unwrap();
            assert_eq!(response.content, "Where to?");
            assert_eq!(response.usage.total_tokens, 24);
            assert_eq!(response.finish_reason, FinishReason::Stop);
        }

        #[test]
        fn length_finish_is_reported() {
            let body = r#"{"model":"m","choices":[{"message":{"content":"par"},"finish_reason":"length"}]}"#;
            let response = parse_completion(body).unwrap();
            assert_eq!(response.finish_reason, FinishReason::Length);
            assert_eq!(response.usage.total_tokens, 0);
        }

        #[test]
        fn empty_choices_is_parse_error() {
            let err = parse_completion(r#"{"model":"m","choices":[]}"#).unwrap_err();
            assert!(matches!(err, AIError::Parse(_)));
        }

        #[test]
        fn filtered_completion_is_error() {
            let body = r#"{"model":"m","choices":[{"message":{"content":null},"finish_reason":"content_filter"}]}"#;
            assert!(matches!(
                parse_completion(body),
                Err(AIError::ContentFiltered { .. })
            ));
        }
    }
}
