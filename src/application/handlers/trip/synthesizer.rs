//! Recommendation synthesizer: one structured generation call simulating the
//! three-agent negotiation, validated after the call.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::planning::{
    parse_synthesis, safe_fallback, synthesis_prompt, AvailableOptions, SynthesisResult,
    SYNTHESIS_MAX_TOKENS, SYNTHESIS_TEMPERATURE,
};
use crate::domain::trip::TripContext;
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

pub struct RecommendationSynthesizer {
    ai_provider: Arc<dyn AIProvider>,
}

impl RecommendationSynthesizer {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    /// Runs the negotiation. Never fails: generation errors and output that
    /// cannot be validated both yield the safe fallback.
    pub async fn synthesize(
        &self,
        session_id: &SessionId,
        ctx: &TripContext,
        options: &AvailableOptions,
    ) -> SynthesisResult {
        if ctx.itinerary_is_truncated() {
            tracing::warn!(
                %session_id,
                trip_days = ctx.trip_days(),
                itinerary_days = ctx.day_count(),
                "trip too long for one itinerary, drafting the first days only"
            );
        }
        let request = CompletionRequest::new(RequestMetadata::new(
            session_id.clone(),
            RequestPurpose::Synthesis,
        ))
        .with_message(MessageRole::User, synthesis_prompt(ctx, options))
        .with_max_tokens(SYNTHESIS_MAX_TOKENS)
        .with_temperature(SYNTHESIS_TEMPERATURE);

        let raw = match self.ai_provider.complete(request).await {
            Ok(response) => response.content,
            Err(err) => {
                tracing::warn!(%session_id, error = %err, "synthesis generation failed, using safe fallback");
                return safe_fallback(options);
            }
        };

        match parse_synthesis(&raw, ctx, options) {
            Ok(result) => {
                tracing::info!(
                    %session_id,
                    days = result.final_decision.itinerary.len(),
                    "synthesis accepted"
                );
                result
            }
            Err(err) => {
                tracing::warn!(%session_id, error = %err, "synthesis output rejected, using safe fallback");
                safe_fallback(options)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::synthesis_output;
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::trip::{OptionRecord, Persona, MAX_ITINERARY_DAYS};
    use serde_json::json;

    fn ctx() -> TripContext {
        TripContext {
            departure_city: Some("BLR".into()),
            destination: Some("GOI".into()),
            start_date: "2026-03-15".parse().ok(),
            end_date: "2026-03-18".parse().ok(),
            budget: Some(60000),
            persona: Persona::Balanced,
        }
    }

    fn options() -> AvailableOptions {
        AvailableOptions {
            flights: vec![OptionRecord::new(json!({"id": "F1", "price": 4599})).unwrap()],
            hotels: vec![OptionRecord::new(json!({"id": "H1", "name": "Taj"})).unwrap()],
            activities: vec![OptionRecord::new(json!({"name": "Baga Beach", "price": 0})).unwrap()],
        }
    }

    fn session_id() -> SessionId {
        "synth".parse().unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_generation() {
        let mock = MockAIProvider::new().with_response(format!("```json\n{}\n```", synthesis_output(3)));
        let synthesizer = RecommendationSynthesizer::new(Arc::new(mock.clone()));

        let result = synthesizer.synthesize(&session_id(), &ctx(), &options()).await;

        assert!(!result.is_fallback);
        assert_eq!(result.debate_transcript.len(), 6);
        assert_eq!(result.final_decision.itinerary.len(), 3);
        assert_eq!(result.final_decision.flight, options().flights.first().cloned());
        assert_eq!(mock.get_calls()[0].metadata.purpose, RequestPurpose::Synthesis);
    }

    #[tokio::test]
    async fn wrong_day_count_falls_back() {
        let mock = MockAIProvider::new().with_response(synthesis_output(1));
        let synthesizer = RecommendationSynthesizer::new(Arc::new(mock));

        let result = synthesizer.synthesize(&session_id(), &ctx(), &options()).await;

        assert!(result.is_fallback);
        assert_eq!(result.debate_transcript.len(), 1);
        assert!(result.final_decision.itinerary.is_empty());
    }

    #[tokio::test]
    async fn long_trip_gets_capped_itinerary() {
        let mock = MockAIProvider::new().with_response(synthesis_output(MAX_ITINERARY_DAYS as u32));
        let synthesizer = RecommendationSynthesizer::new(Arc::new(mock.clone()));
        let long = TripContext {
            end_date: "2027-03-15".parse().ok(),
            ..ctx()
        };

        let result = synthesizer.synthesize(&session_id(), &long, &options()).await;

        assert!(!result.is_fallback);
        assert_eq!(result.final_decision.itinerary.len(), MAX_ITINERARY_DAYS);
        assert!(mock.get_calls()[0].messages[0]
            .content
            .contains(&format!("Number of days: {}", MAX_ITINERARY_DAYS)));
    }

    #[tokio::test]
    async fn generation_error_falls_back() {
        let mock = MockAIProvider::always_failing(MockError::AuthenticationFailed);
        let synthesizer = RecommendationSynthesizer::new(Arc::new(mock));

        let result = synthesizer.synthesize(&session_id(), &ctx(), &options()).await;

        assert!(result.is_fallback);
        assert_eq!(result.final_decision.activities, options().activities);
    }
}
