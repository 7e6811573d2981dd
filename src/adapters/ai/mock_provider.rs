//! Scripted AI provider for tests.
//!
//! Replies are consumed from a queue in order; once the queue is empty every
//! call gets the fallback outcome. Each request is recorded so tests can
//! inspect the prompts the application built.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_error(MockError::Unavailable { message: "overloaded".into() })
//!     .with_response("Where would you like to go?");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const MOCK_MODEL: &str = "mock-model-1";

/// Failures a test can inject.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    NotConfigured,
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::NotConfigured => AIError::NotConfigured,
        }
    }
}

type Scripted = Result<String, MockError>;

#[derive(Debug, Clone)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    fallback: Scripted,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::default(),
            fallback: Ok("Mock response".to_string()),
            requests: Arc::default(),
        }
    }

    /// Every call fails with `error`.
    pub fn always_failing(error: MockError) -> Self {
        Self {
            fallback: Err(error),
            ..Self::new()
        }
    }

    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(content.into()));
        self
    }

    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Reply used once the script runs dry.
    pub fn with_default_response(mut self, content: impl Into<String>) -> Self {
        self.fallback = Ok(content.into());
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let words = request
            .messages
            .iter()
            .map(|m| m.content.split_whitespace().count())
            .sum::<usize>() as u32;
        lock(&self.requests).push(request);

        let next = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let content = next?;
        Ok(CompletionResponse {
            usage: TokenUsage::new(words, content.split_whitespace().count() as u32),
            content,
            model: MOCK_MODEL.to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", MOCK_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{MessageRole, RequestMetadata, RequestPurpose};

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(SessionId::new(), RequestPurpose::Reply))
            .with_message(MessageRole::User, text)
    }

    #[tokio::test]
    async fn script_is_consumed_before_fallback() {
        let provider = MockAIProvider::new()
            .with_error(MockError::RateLimited { retry_after_secs: 30 })
            .with_response("Where to?");

        let err = provider.complete(request("hi")).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
        assert_eq!(provider.complete(request("hi")).await.unwrap().content, "Where to?");
        assert_eq!(provider.complete(request("hi")).await.unwrap().content, "Mock response");
    }

    #[tokio::test]
    async fn always_failing_never_recovers() {
        let provider = MockAIProvider::always_failing(MockError::NotConfigured);
        for _ in 0..3 {
            assert!(matches!(
                provider.complete(request("hi")).await,
                Err(AIError::NotConfigured)
            ));
        }
    }

    #[tokio::test]
    async fn usage_counts_words() {
        let provider = MockAIProvider::new().with_default_response("Goa it is");
        let response = provider.complete(request("fly me to Goa")).await.unwrap();
        assert_eq!(response.usage, TokenUsage::new(4, 3));
    }

    #[tokio::test]
    async fn clones_share_recorded_requests() {
        let provider = MockAIProvider::new();
        provider.clone().complete(request("from Pune")).await.unwrap();
        provider.complete(request("to Goa")).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.get_calls()[0].messages[0].content, "from Pune");
    }
}
