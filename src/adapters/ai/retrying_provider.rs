//! Retrying AI Provider - Wrapper that retries transient load failures.
//!
//! Rate-limit and overload errors are retried with a linearly growing delay
//! (`base`, `2 * base`, ...) until `max_attempts` calls have been made. Every
//! other error is returned to the caller on the first attempt.
//!
//! # Example
//!
//! ```ignore
//! let inner: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(config)?);
//! let provider = RetryingProvider::new(inner)
//!     .with_max_attempts(3)
//!     .with_base_delay(Duration::from_secs(2));
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Wraps another provider with the linear retry policy.
pub struct RetryingProvider {
    inner: Arc<dyn AIProvider>,
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn AIProvider>) -> Self {
        Self {
            inner,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Total calls, including the first; values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay after failed attempt number `attempt` (zero-based).
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt + 1)
    }
}

#[async_trait]
impl AIProvider for RetryingProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt + 1 < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        provider = %self.inner.provider_info().name,
                        purpose = %request.metadata.purpose,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient generation failure, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::SessionId;
    use crate::ports::{MessageRole, RequestMetadata, RequestPurpose};

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(SessionId::new(), RequestPurpose::Reply))
            .with_message(MessageRole::User, "hi")
    }

    fn wrap(mock: &MockAIProvider) -> RetryingProvider {
        RetryingProvider::new(Arc::new(mock.clone())).with_base_delay(Duration::from_millis(1))
    }

    #[test]
    fn delays_grow_linearly() {
        let provider = RetryingProvider::new(Arc::new(MockAIProvider::new()));
        assert_eq!(provider.delay_for(0), Duration::from_secs(2));
        assert_eq!(provider.delay_for(1), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn retries_load_errors_until_success() {
        let mock = MockAIProvider::new()
            .with_error(MockError::RateLimited { retry_after_secs: 1 })
            .with_error(MockError::Unavailable {
                message: "overloaded".into(),
            })
            .with_response("finally");

        let response = wrap(&mock).complete(request()).await.unwrap();

        assert_eq!(response.content, "finally");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_three_attempts() {
        let mock = MockAIProvider::always_failing(MockError::Unavailable {
            message: "overloaded".into(),
        });

        let err = wrap(&mock).complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::Unavailable { .. }));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn single_attempt_never_retries() {
        let mock = MockAIProvider::always_failing(MockError::RateLimited { retry_after_secs: 1 });

        let err = wrap(&mock).with_max_attempts(1).complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::RateLimited { .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn other_errors_surface_immediately() {
        let mock = MockAIProvider::always_failing(MockError::AuthenticationFailed);

        let err = wrap(&mock).complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::AuthenticationFailed));
        assert_eq!(mock.call_count(), 1);
    }
}
