//! ProcessMessageHandler - Handle one free-text user message.
//!
//! Either answers an explicit options request with a canned acknowledgment,
//! or extracts facts, advances the stage and generates a reply for the stage
//! the session has moved into.

use std::sync::Arc;

use crate::domain::conversation::{plan_turn, TurnPlan};
use crate::domain::foundation::SessionId;
use crate::domain::trip::Persona;
use crate::ports::{AIProvider, SessionStore};

use super::outcome::{save_or_discard, TripHandlerError, TurnOutcome};
use super::reply_generator::ReplyGenerator;

/// Command to process a user message
#[derive(Debug, Clone)]
pub struct ProcessMessageCommand {
    pub session_id: SessionId,
    pub message: String,
    /// Replaces the session persona when present.
    pub persona: Option<Persona>,
}

/// Handler for user messages
pub struct ProcessMessageHandler {
    store: Arc<dyn SessionStore>,
    replies: ReplyGenerator,
}

impl ProcessMessageHandler {
    pub fn new(store: Arc<dyn SessionStore>, ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            store,
            replies: ReplyGenerator::new(ai_provider),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(session_id = %cmd.session_id))]
    pub async fn handle(&self, cmd: ProcessMessageCommand) -> Result<TurnOutcome, TripHandlerError> {
        let mut session = self.store.load_or_create(&cmd.session_id).await?;
        let mut info = session.info().clone();
        if let Some(persona) = cmd.persona {
            info.persona = Some(persona);
        }

        let (message, signal) = match plan_turn(session.stage(), &info, &cmd.message) {
            TurnPlan::OptionsRequest {
                category,
                accepted,
                transition,
                message,
            } => {
                tracing::info!(%category, accepted, "options requested");
                session.apply(info, transition.stage);
                (message, transition.signal)
            }
            TurnPlan::Collect {
                info,
                facts,
                transition,
            } => {
                if !facts.is_empty() {
                    tracing::debug!(fields = ?facts.fields(), "facts extracted");
                }
                session.apply(info, transition.stage);
                let reply = self.replies.reply(&session, &cmd.message).await;
                (reply, transition.signal)
            }
        };

        session.record_exchange(cmd.message, message.clone());
        save_or_discard(self.store.as_ref(), &mut session).await?;

        tracing::info!(
            stage = %session.stage(),
            signal = ?signal,
            "turn processed"
        );
        Ok(TurnOutcome::from_session(&session, message, signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::conversation::replies::fallback_reply;
    use crate::domain::trip::{OptionsCategory, Stage};
    use chrono::NaiveDate;

    fn handler(ai: MockAIProvider) -> (ProcessMessageHandler, InMemorySessionStore) {
        let store = InMemorySessionStore::new();
        let handler = ProcessMessageHandler::new(Arc::new(store.clone()), Arc::new(ai));
        (handler, store)
    }

    fn cmd(message: &str) -> ProcessMessageCommand {
        ProcessMessageCommand {
            session_id: "chat-1".parse().unwrap(),
            message: message.to_string(),
            persona: None,
        }
    }

    mod collection {
        use super::*;

        #[tokio::test]
        async fn worked_example_fills_every_fact() {
            let (handler, _) = handler(MockAIProvider::always_failing(MockError::NotConfigured));

            let outcome = handler
                .handle(cmd(
                    "I want to go from Bangalore to Goa on 2026-03-15 for 5 days with a budget of 60000",
                ))
                .await
                .unwrap();

            let info = &outcome.collected_info;
            assert_eq!(info.departure_city.as_deref(), Some("BLR"));
            assert_eq!(info.destination.as_deref(), Some("GOI"));
            assert_eq!(info.start_date, NaiveDate::from_ymd_opt(2026, 3, 15));
            assert_eq!(info.end_date, NaiveDate::from_ymd_opt(2026, 3, 20));
            assert_eq!(info.budget, Some(60000));
            assert_eq!(outcome.current_stage, Stage::Departure);
        }

        #[tokio::test]
        async fn generated_reply_is_used() {
            let (handler, _) = handler(MockAIProvider::new().with_response("Where to?"));
            let outcome = handler.handle(cmd("from Mumbai")).await.unwrap();

            assert_eq!(outcome.message, "Where to?");
            assert_eq!(outcome.collected_info.departure_city.as_deref(), Some("BOM"));
            assert_eq!(outcome.current_stage, Stage::Departure);
        }

        #[tokio::test]
        async fn fallback_reply_matches_new_stage() {
            let (handler, _) = handler(MockAIProvider::always_failing(MockError::NotConfigured));
            let outcome = handler.handle(cmd("I live in Chennai")).await.unwrap();

            assert_eq!(outcome.message, fallback_reply(Stage::Departure));
        }

        #[tokio::test]
        async fn history_is_recorded_and_revision_advances() {
            let (handler, store) = handler(MockAIProvider::new());
            handler.handle(cmd("hello")).await.unwrap();
            let outcome = handler.handle(cmd("from Delhi")).await.unwrap();

            assert_eq!(outcome.revision, 2);
            let session = store.load(&"chat-1".parse().unwrap()).await.unwrap().unwrap();
            assert_eq!(session.history().len(), 4);
            assert_eq!(session.history()[2].content, "from Delhi");
        }

        #[tokio::test]
        async fn persona_is_stored() {
            let (handler, _) = handler(MockAIProvider::new());
            let mut command = cmd("hello");
            command.persona = Some(Persona::Luxury);

            let outcome = handler.handle(command).await.unwrap();
            assert_eq!(outcome.collected_info.persona, Some(Persona::Luxury));
        }
    }

    mod options_requests {
        use super::*;

        #[tokio::test]
        async fn missing_destination_redirects() {
            let mock = MockAIProvider::new();
            let (handler, _) = handler(mock.clone());

            let outcome = handler.handle(cmd("show me hotels")).await.unwrap();

            assert_eq!(outcome.current_stage, Stage::Greeting);
            assert!(!outcome.should_show_options());
            assert_eq!(mock.call_count(), 0);
        }

        #[tokio::test]
        async fn accepted_request_jumps_and_signals() {
            let (handler, _) = handler(MockAIProvider::always_failing(MockError::NotConfigured));
            handler.handle(cmd("from Pune to Jaipur")).await.unwrap();

            let outcome = handler.handle(cmd("show me hotels")).await.unwrap();

            assert_eq!(outcome.current_stage, Stage::Hotels);
            assert_eq!(outcome.signal, Some(OptionsCategory::Hotels));
        }
    }
}
