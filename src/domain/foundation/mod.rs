//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the stage state machine contract and the error
//! vocabulary used across the trip planning domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::SessionId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
