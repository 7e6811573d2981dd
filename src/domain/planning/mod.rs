//! Planning domain - multi-agent synthesis and itinerary assembly.

pub mod debate;
pub mod decision;
pub mod itinerary;
pub mod recommendation;
pub mod synthesis;

pub use debate::{AgentRole, Argument};
pub use decision::{DayPlan, FinalDecision, ScheduleSlot, TimeSlot};
pub use itinerary::{
    allocate_budget, assemble, assemble_with_costs, summarize_budget, summarize_costs,
    trip_allocation, trip_duration, BudgetAllocation, BudgetSummary, CategoryCosts,
    PlanningResult,
};
pub use recommendation::{
    category_share, decided_records, parse_total_cost, recommendation_limits,
    recommendation_prompt, with_cost, RecommendationError,
};
pub use synthesis::{
    parse_synthesis, safe_fallback, synthesis_prompt, AvailableOptions, SynthesisError,
    SynthesisResult, SYNTHESIS_MAX_TOKENS, SYNTHESIS_TEMPERATURE,
};
