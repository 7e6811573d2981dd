//! Specialist recommendations.
//!
//! Before the plan is costed, a flight, a hotel and an activity specialist
//! each review the chosen records for their category against that
//! category's share of the budget and the traveller's persona. Each answers
//! with a JSON body carrying `total_cost`; that figure replaces the raw
//! record price in the budget summary.

use serde_json::Value;
use thiserror::Error;

use super::decision::FinalDecision;
use super::itinerary::{BudgetAllocation, CategoryCosts};
use super::synthesis::strip_code_fence;
use crate::domain::trip::{OptionRecord, OptionsCategory, TripContext};

#[derive(Debug, Error, PartialEq)]
pub enum RecommendationError {
    #[error("recommendation is not valid JSON: {0}")]
    Malformed(String),

    #[error("recommendation has no total_cost")]
    MissingTotal,

    #[error("recommendation total_cost {0} is not a usable amount")]
    InvalidTotal(f64),
}

/// Sampling limits per specialist: `(max_tokens, temperature)`.
pub fn recommendation_limits(category: OptionsCategory) -> (u32, f32) {
    match category {
        OptionsCategory::Flights => (800, 0.7),
        OptionsCategory::Hotels => (600, 0.5),
        OptionsCategory::Activities => (1200, 0.7),
    }
}

/// The part of the allocation a specialist must stay within.
pub fn category_share(category: OptionsCategory, allocation: &BudgetAllocation) -> f64 {
    match category {
        OptionsCategory::Flights => allocation.flights,
        OptionsCategory::Hotels => allocation.hotels,
        OptionsCategory::Activities => allocation.activities,
    }
}

/// Records of `category` the decision settled on.
pub fn decided_records(category: OptionsCategory, decision: &FinalDecision) -> Vec<OptionRecord> {
    match category {
        OptionsCategory::Flights => decision.flight.iter().cloned().collect(),
        OptionsCategory::Hotels => decision.hotel.iter().cloned().collect(),
        OptionsCategory::Activities => decision.activities.clone(),
    }
}

/// Replaces one category's cost.
pub fn with_cost(costs: CategoryCosts, category: OptionsCategory, total: f64) -> CategoryCosts {
    match category {
        OptionsCategory::Flights => CategoryCosts { flight: total, ..costs },
        OptionsCategory::Hotels => CategoryCosts { hotel: total, ..costs },
        OptionsCategory::Activities => CategoryCosts {
            activities: total,
            ..costs
        },
    }
}

/// Builds the request for one specialist.
pub fn recommendation_prompt(
    category: OptionsCategory,
    ctx: &TripContext,
    share: f64,
    candidates: &[OptionRecord],
) -> String {
    let destination = ctx.destination.as_deref().unwrap_or_default();
    let days = ctx.day_count();
    let candidates_json =
        serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    match category {
        OptionsCategory::Flights => format!(
            r#"You are a flight booking expert. Review the chosen flights and price the plan.

User Requirements:
- Destination: {destination}
- Budget for flights: ₹{share:.0}
- Travel Persona: {persona}
- Travel Date: {start}

Chosen Flights:
{candidates_json}

Keep the total cost within the budget where possible.
Return ONLY valid JSON, no markdown, shaped like:
{{
  "recommended_flights": [
    {{"flight_id": "string", "airline": "string", "price": 0, "reason": "why this flight"}}
  ],
  "total_cost": 0
}}
"#,
            persona = ctx.persona,
            start = ctx.start_date.map(|d| d.to_string()).unwrap_or_default(),
        ),
        OptionsCategory::Hotels => format!(
            r#"You are a hotel booking expert. Review the chosen hotel and price the stay.

User Requirements:
- Destination: {destination}
- Budget: ₹{share:.0}
- Travel Persona: {persona}
- Stay Duration: {days} nights

Chosen Hotel:
{candidates_json}

Calculate the total cost as price_per_night × {days}.
Return ONLY valid JSON, no markdown, shaped like:
{{
  "recommended_hotel": {{
    "hotel_id": "string",
    "name": "string",
    "price_per_night": 0,
    "total_cost": 0,
    "reason": "why selected"
  }}
}}
"#,
            persona = ctx.persona,
        ),
        OptionsCategory::Activities => format!(
            r#"You are a travel activity expert. Arrange the chosen activities into a day-wise plan and price it.

User Requirements:
- Destination: {destination}
- Budget for activities: ₹{share:.0}
- Travel Persona: {persona}
- Trip Duration: {days} days

Chosen Activities:
{candidates_json}

Return ONLY valid JSON, no markdown, shaped like:
{{
  "day_wise_activities": [
    {{"day": 1, "activities": [{{"name": "string", "time_of_day": "morning", "price": 0}}]}}
  ],
  "total_cost": 0,
  "reason": "explanation of the plan"
}}
"#,
            persona = ctx.persona,
        ),
    }
}

/// Reads the specialist's `total_cost`.
///
/// Hotels nest it under `recommended_hotel`; the other categories carry it at
/// the top level. Negative or non-finite amounts are rejected.
pub fn parse_total_cost(category: OptionsCategory, raw: &str) -> Result<f64, RecommendationError> {
    let body: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| RecommendationError::Malformed(e.to_string()))?;
    let pointer = match category {
        OptionsCategory::Hotels => "/recommended_hotel/total_cost",
        OptionsCategory::Flights | OptionsCategory::Activities => "/total_cost",
    };

    let total = match body.pointer(pointer) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
    .ok_or(RecommendationError::MissingTotal)?;

    if total.is_finite() && total >= 0.0 {
        Ok(total)
    } else {
        Err(RecommendationError::InvalidTotal(total))
    }
}
