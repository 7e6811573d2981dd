//! Conversation domain - turning utterances into trip facts and stage moves.

pub mod dialogue;
pub mod extractor;
pub mod intent;
pub mod prompts;
pub mod replies;

pub use dialogue::{
    finalize, plan_turn, select_activity, select_flight, select_hotel, transition, DialogueEvent,
    SelectionOutcome, Transition, TurnPlan,
};
pub use extractor::{extract, ExtractedFacts};
pub use intent::{detect_intent, prerequisites_met};
