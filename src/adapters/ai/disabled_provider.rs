//! Disabled AI Provider - used when no text-generation backend is configured.
//!
//! Every call fails with a non-retryable `NotConfigured` error, so callers go
//! straight to their canned fallback content.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAIProvider;

#[async_trait]
impl AIProvider for DisabledAIProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::NotConfigured)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("disabled", "none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{RequestMetadata, RequestPurpose};

    #[tokio::test]
    async fn fails_without_retry() {
        let request = CompletionRequest::new(RequestMetadata::new(
            SessionId::new(),
            RequestPurpose::Synthesis,
        ));
        let err = DisabledAIProvider.complete(request).await.unwrap_err();
        assert!(matches!(err, AIError::NotConfigured));
        assert!(!err.is_retryable());
    }
}
