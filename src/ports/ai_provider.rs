//! AI Provider Port - Interface for text-generation integrations.
//!
//! The planner needs generated text for the conversational reply of each
//! turn, the synthesis request that drafts the itinerary and the specialist
//! requests that price each category. All of them go through this port, so
//! the application layer never sees a vendor API.
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::new(RequestMetadata::new(session_id, RequestPurpose::Reply))
//!     .with_system_prompt(prompt)
//!     .with_message(MessageRole::User, "from Bangalore")
//!     .with_max_tokens(150);
//! let response = provider.complete(request).await?;
//! ```

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;
use crate::domain::trip::OptionsCategory;

#[async_trait]
pub trait AIProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Backend name and model, for logs and startup diagnostics.
    fn provider_info(&self) -> ProviderInfo;
}

/// One chat-completion call: optional system prompt, ordered turns and
/// sampling limits.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// What a completion is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestPurpose {
    /// Conversational reply during fact collection.
    Reply,
    /// Multi-agent itinerary synthesis.
    Synthesis,
    FlightRecommendation,
    HotelRecommendation,
    ActivityRecommendation,
}

impl RequestPurpose {
    /// The specialist request for `category`.
    pub fn recommendation(category: OptionsCategory) -> Self {
        match category {
            OptionsCategory::Flights => Self::FlightRecommendation,
            OptionsCategory::Hotels => Self::HotelRecommendation,
            OptionsCategory::Activities => Self::ActivityRecommendation,
        }
    }
}

impl fmt::Display for RequestPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reply => "reply",
            Self::Synthesis => "synthesis",
            Self::FlightRecommendation => "flight_recommendation",
            Self::HotelRecommendation => "hotel_recommendation",
            Self::ActivityRecommendation => "activity_recommendation",
        })
    }
}

/// Correlates provider calls with the session and turn that caused them.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub session_id: SessionId,
    pub purpose: RequestPurpose,
    pub trace_id: String,
}

impl RequestMetadata {
    /// Creates metadata with a fresh trace id.
    pub fn new(session_id: SessionId, purpose: RequestPurpose) -> Self {
        Self {
            session_id,
            purpose,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Model name as echoed by the backend.
    pub model: String,
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    /// `max_tokens` was reached; the content is truncated.
    Length,
    ContentFilter,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// `openai`, `azure`, `disabled` or `mock`
    pub name: String,
    /// Model or Azure deployment
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Why a completion could not be produced.
///
/// Callers never surface these to the traveller; a failed reply becomes the
/// stage's canned text and a failed synthesis becomes the rule-based plan.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("context too long: {message}")]
    ContextTooLong { message: String },

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// 5xx or explicit overload from the backend.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a body we could not read.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("text generation is not configured")]
    NotConfigured,
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn context_too_long(message: impl Into<String>) -> Self {
        Self::ContextTooLong {
            message: message.into(),
        }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Rate limiting and overload are worth another attempt; everything else
    /// goes straight to the fallback content.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AIError::RateLimited { .. } | AIError::Unavailable { .. })
    }
}
