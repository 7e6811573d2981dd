//! Itinerary assembly and budget accounting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::debate::Argument;
use super::decision::FinalDecision;
use super::synthesis::SynthesisResult;
use crate::domain::foundation::Timestamp;
use crate::domain::trip::{OptionRecord, TripContext, DEFAULT_TRIP_DAYS};

const FLIGHT_SHARE: f64 = 0.40;
const HOTEL_SHARE: f64 = 0.35;
const ACTIVITY_SHARE: f64 = 0.25;

/// Suggested split of the total budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub flights: f64,
    pub hotels: f64,
    pub activities: f64,
    pub per_day_activities: f64,
}

/// 40% flights, 35% hotels, 25% activities; the activity share is spread
/// over the trip's days.
pub fn allocate_budget(total_budget: f64, duration_days: i64) -> BudgetAllocation {
    let activities = total_budget * ACTIVITY_SHARE;
    BudgetAllocation {
        flights: total_budget * FLIGHT_SHARE,
        hotels: total_budget * HOTEL_SHARE,
        activities,
        per_day_activities: activities / duration_days.max(1) as f64,
    }
}

/// Inclusive number of days from `start` to `end`.
pub fn trip_duration(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Spend per category against the traveller's budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_budget: Option<u64>,
    pub flight_cost: f64,
    pub hotel_cost: f64,
    pub activities_cost: f64,
    pub total_spent: f64,
    /// Budget minus spend; negative when over budget. Absent without a budget.
    pub remaining: Option<f64>,
    pub duration_days: i64,
    pub allocation: Option<BudgetAllocation>,
}

impl BudgetSummary {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_some_and(|r| r < 0.0)
    }
}

/// Price of a flight record.
pub fn flight_cost(flight: &OptionRecord) -> f64 {
    flight.price().unwrap_or(0.0)
}

/// Hotel stay cost: `total_cost`, else nightly rate times nights, else `price`.
pub fn hotel_cost(hotel: &OptionRecord, nights: i64) -> f64 {
    hotel
        .number("total_cost")
        .or_else(|| hotel.number("price_per_night").map(|rate| rate * nights.max(1) as f64))
        .or_else(|| hotel.price())
        .unwrap_or(0.0)
}

pub fn activities_cost(activities: &[OptionRecord]) -> f64 {
    activities.iter().filter_map(OptionRecord::price).sum()
}

/// What each category of the trip costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCosts {
    pub flight: f64,
    pub hotel: f64,
    pub activities: f64,
}

impl CategoryCosts {
    /// Prices read straight off the decision's records.
    pub fn of_decision(ctx: &TripContext, decision: &FinalDecision) -> Self {
        let (_, nights) = stay_length(ctx);
        Self {
            flight: decision.flight.as_ref().map(flight_cost).unwrap_or(0.0),
            hotel: decision
                .hotel
                .as_ref()
                .map(|h| hotel_cost(h, nights))
                .unwrap_or(0.0),
            activities: activities_cost(&decision.activities),
        }
    }

    pub fn total(&self) -> f64 {
        self.flight + self.hotel + self.activities
    }
}

/// Inclusive trip days and nights stayed.
fn stay_length(ctx: &TripContext) -> (i64, i64) {
    match (ctx.start_date, ctx.end_date) {
        (Some(start), Some(end)) if end >= start => {
            (trip_duration(start, end), (end - start).num_days())
        }
        _ => (DEFAULT_TRIP_DAYS, DEFAULT_TRIP_DAYS),
    }
}

/// The budget split for `ctx`, if it has a budget.
pub fn trip_allocation(ctx: &TripContext) -> Option<BudgetAllocation> {
    let (duration_days, _) = stay_length(ctx);
    ctx.budget.map(|b| allocate_budget(b as f64, duration_days))
}

/// Accounts the decision's flight, hotel and activities against the budget.
pub fn summarize_budget(ctx: &TripContext, decision: &FinalDecision) -> BudgetSummary {
    summarize_costs(ctx, CategoryCosts::of_decision(ctx, decision))
}

/// Accounts already-known category costs against the budget.
pub fn summarize_costs(ctx: &TripContext, costs: CategoryCosts) -> BudgetSummary {
    let (duration_days, _) = stay_length(ctx);
    let total_spent = costs.total();

    BudgetSummary {
        total_budget: ctx.budget,
        flight_cost: costs.flight,
        hotel_cost: costs.hotel,
        activities_cost: costs.activities,
        total_spent,
        remaining: ctx.budget.map(|b| b as f64 - total_spent),
        duration_days,
        allocation: trip_allocation(ctx),
    }
}

/// The final trip record sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResult {
    pub debate_transcript: Vec<Argument>,
    pub final_decision: FinalDecision,
    pub budget_summary: BudgetSummary,
    pub generated_at: Timestamp,
}

/// Merges synthesis output with budget accounting over the decision's prices.
pub fn assemble(ctx: &TripContext, synthesis: SynthesisResult) -> PlanningResult {
    let costs = CategoryCosts::of_decision(ctx, &synthesis.final_decision);
    assemble_with_costs(ctx, synthesis, costs)
}

/// Merges synthesis output with the given category costs.
pub fn assemble_with_costs(
    ctx: &TripContext,
    synthesis: SynthesisResult,
    costs: CategoryCosts,
) -> PlanningResult {
    let budget_summary = summarize_costs(ctx, costs);
    if budget_summary.is_over_budget() {
        tracing::info!(
            total_spent = budget_summary.total_spent,
            remaining = ?budget_summary.remaining,
            "assembled itinerary exceeds budget"
        );
    }
    PlanningResult {
        debate_transcript: synthesis.debate_transcript,
        final_decision: synthesis.final_decision,
        budget_summary,
        generated_at: Timestamp::now(),
    }
}
