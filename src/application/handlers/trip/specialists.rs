//! Specialist panel: prices each category of the decided plan with one
//! generation call per category.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::planning::{
    category_share, decided_records, parse_total_cost, recommendation_limits,
    recommendation_prompt, trip_allocation, with_cost, CategoryCosts, FinalDecision,
};
use crate::domain::trip::{OptionsCategory, TripContext};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

/// Categories in the order the specialists are consulted.
const PANEL: [OptionsCategory; 3] = [
    OptionsCategory::Flights,
    OptionsCategory::Hotels,
    OptionsCategory::Activities,
];

pub struct SpecialistPanel {
    ai_provider: Arc<dyn AIProvider>,
}

impl SpecialistPanel {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    /// Costs for each category of `decision`.
    ///
    /// Starts from the decision's own prices; every specialist that answers
    /// with a usable `total_cost` replaces its category's figure. Without a
    /// budget there is nothing to allocate and no specialist is asked.
    pub async fn price(
        &self,
        session_id: &SessionId,
        ctx: &TripContext,
        decision: &FinalDecision,
    ) -> CategoryCosts {
        let mut costs = CategoryCosts::of_decision(ctx, decision);
        let Some(allocation) = trip_allocation(ctx) else {
            tracing::debug!(%session_id, "no budget, pricing from selections");
            return costs;
        };

        for category in PANEL {
            let candidates = decided_records(category, decision);
            if candidates.is_empty() {
                continue;
            }
            let share = category_share(category, &allocation);
            let (max_tokens, temperature) = recommendation_limits(category);
            let request = CompletionRequest::new(RequestMetadata::new(
                session_id.clone(),
                RequestPurpose::recommendation(category),
            ))
            .with_message(
                MessageRole::User,
                recommendation_prompt(category, ctx, share, &candidates),
            )
            .with_max_tokens(max_tokens)
            .with_temperature(temperature);

            let total = match self.ai_provider.complete(request).await {
                Ok(response) => parse_total_cost(category, &response.content),
                Err(err) => {
                    tracing::warn!(%session_id, %category, error = %err, "specialist unavailable, using selection cost");
                    continue;
                }
            };
            match total {
                Ok(total) => {
                    tracing::debug!(%session_id, %category, total, share, "specialist priced category");
                    costs = with_cost(costs, category, total);
                }
                Err(err) => {
                    tracing::warn!(%session_id, %category, error = %err, "specialist answer rejected, using selection cost");
                }
            }
        }
        costs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::trip::{OptionRecord, Persona};
    use serde_json::json;

    fn ctx(budget: Option<u64>) -> TripContext {
        TripContext {
            departure_city: Some("BLR".into()),
            destination: Some("GOI".into()),
            start_date: "2026-03-15".parse().ok(),
            end_date: "2026-03-17".parse().ok(),
            budget,
            persona: Persona::Budget,
        }
    }

    fn decision() -> FinalDecision {
        FinalDecision {
            flight: OptionRecord::new(json!({"id": "F1", "price": 12000})).ok(),
            hotel: OptionRecord::new(json!({"id": "H1", "price_per_night": 20000})).ok(),
            itinerary: Vec::new(),
            activities: vec![OptionRecord::new(json!({"name": "Scuba", "price": 10000})).unwrap()],
            reasoning: String::new(),
            key_tradeoffs: String::new(),
        }
    }

    fn session_id() -> SessionId {
        "panel".parse().unwrap()
    }

    #[tokio::test]
    async fn specialist_totals_replace_selection_prices() {
        let mock = MockAIProvider::new()
            .with_response(r#"{"recommended_flights": [], "total_cost": 11000}"#)
            .with_response(r#"{"recommended_hotel": {"name": "Taj", "total_cost": 36000}}"#)
            .with_response(r#"{"day_wise_activities": [], "total_cost": 9000}"#);
        let panel = SpecialistPanel::new(Arc::new(mock.clone()));

        let costs = panel.price(&session_id(), &ctx(Some(50000)), &decision()).await;

        assert_eq!(
            costs,
            CategoryCosts {
                flight: 11000.0,
                hotel: 36000.0,
                activities: 9000.0
            }
        );
        let purposes: Vec<_> = mock.get_calls().iter().map(|c| c.metadata.purpose).collect();
        assert_eq!(
            purposes,
            vec![
                RequestPurpose::FlightRecommendation,
                RequestPurpose::HotelRecommendation,
                RequestPurpose::ActivityRecommendation
            ]
        );
        let flight_prompt = &mock.get_calls()[0].messages[0].content;
        assert!(flight_prompt.contains("Budget for flights: ₹20000"));
        assert!(flight_prompt.contains("Travel Persona: budget"));
    }

    #[tokio::test]
    async fn failures_keep_selection_costs() {
        let mock = MockAIProvider::new()
            .with_error(MockError::Unavailable {
                message: "overloaded".into(),
            })
            .with_response("I think the hotel is fine.")
            .with_response(r#"{"total_cost": 4000}"#);
        let panel = SpecialistPanel::new(Arc::new(mock));

        let costs = panel.price(&session_id(), &ctx(Some(50000)), &decision()).await;

        // Flight and hotel from the records: 12000, and 20000 * 2 nights.
        assert_eq!(costs.flight, 12000.0);
        assert_eq!(costs.hotel, 40000.0);
        assert_eq!(costs.activities, 4000.0);
    }

    #[tokio::test]
    async fn no_budget_asks_nobody() {
        let mock = MockAIProvider::new();
        let panel = SpecialistPanel::new(Arc::new(mock.clone()));

        let costs = panel.price(&session_id(), &ctx(None), &decision()).await;

        assert_eq!(costs.total(), 62000.0);
        assert_eq!(mock.call_count(), 0);
    }
}
