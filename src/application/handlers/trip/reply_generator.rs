//! Generates the assistant's reply for a fact-collection turn.

use std::sync::Arc;

use crate::domain::conversation::prompts::{
    collection_system_prompt, REPLY_MAX_TOKENS, REPLY_TEMPERATURE,
};
use crate::domain::conversation::replies::fallback_reply;
use crate::domain::trip::{Stage, TripSession, TurnRole};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

/// Asks the text-generation provider for a reply, falling back to a canned
/// sentence for the stage on any failure.
pub struct ReplyGenerator {
    ai_provider: Arc<dyn AIProvider>,
}

impl ReplyGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    /// `session` holds the updated facts and stage; `utterance` is the new
    /// user message, not yet in the session history.
    pub async fn reply(&self, session: &TripSession, utterance: &str) -> String {
        let request = self.build_request(session, utterance);
        match self.ai_provider.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                response.content.trim().to_string()
            }
            Ok(_) => {
                tracing::warn!(session_id = %session.id(), "empty generated reply, using fallback");
                fallback_reply(session.stage()).to_string()
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id(),
                    stage = %session.stage(),
                    error = %err,
                    "reply generation failed, using fallback"
                );
                fallback_reply(session.stage()).to_string()
            }
        }
    }

    fn build_request(&self, session: &TripSession, utterance: &str) -> CompletionRequest {
        let stage: Stage = session.stage();
        let mut request = CompletionRequest::new(RequestMetadata::new(
            session.id().clone(),
            RequestPurpose::Reply,
        ))
        .with_system_prompt(collection_system_prompt(stage, session.info()))
        .with_max_tokens(REPLY_MAX_TOKENS)
        .with_temperature(REPLY_TEMPERATURE);

        for turn in session.history() {
            let role = match turn.role {
                TurnRole::User => MessageRole::User,
                TurnRole::Assistant => MessageRole::Assistant,
            };
            request = request.with_message(role, turn.content.clone());
        }
        request.with_message(MessageRole::User, utterance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    fn session() -> TripSession {
        let mut session = TripSession::new("reply-test".parse().unwrap());
        session.record_exchange("hello", "Hi! Where are you traveling from?");
        session
    }

    #[tokio::test]
    async fn uses_generated_reply_with_history() {
        let mock = MockAIProvider::new().with_response("  Where to next?  ");
        let generator = ReplyGenerator::new(Arc::new(mock.clone()));

        let reply = generator.reply(&session(), "from Pune").await;

        assert_eq!(reply, "Where to next?");
        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].content, "from Pune");
        assert!(request
            .system_prompt
            .as_deref()
            .is_some_and(|p| p.contains("Current stage: greeting")));
        assert_eq!(request.metadata.purpose, RequestPurpose::Reply);
    }

    #[tokio::test]
    async fn falls_back_on_failure() {
        let mock = MockAIProvider::always_failing(MockError::NotConfigured);
        let generator = ReplyGenerator::new(Arc::new(mock));

        let reply = generator.reply(&session(), "hi").await;

        assert_eq!(reply, fallback_reply(Stage::Greeting));
    }

    #[tokio::test]
    async fn falls_back_on_empty_reply() {
        let mock = MockAIProvider::new().with_response("   ");
        let generator = ReplyGenerator::new(Arc::new(mock));

        assert_eq!(
            generator.reply(&session(), "hi").await,
            fallback_reply(Stage::Greeting)
        );
    }
}
