//! Trip planning handlers.
//!
//! One handler per surface operation: free-text messages, option selection,
//! option fetching, finalization and the session snapshot query.

mod fetch_options;
mod finalize_trip;
mod get_session;
mod outcome;
mod process_message;
mod reply_generator;
mod select_option;
mod specialists;
mod synthesizer;

pub use fetch_options::{FetchOptionsCommand, FetchOptionsHandler, OptionsBatch, OptionsSource};
pub use finalize_trip::{FinalizeTripCommand, FinalizeTripHandler, FinalizeTripResult};
pub use get_session::{GetSessionHandler, SessionSnapshot};
pub use outcome::{TripHandlerError, TurnOutcome};
pub use process_message::{ProcessMessageCommand, ProcessMessageHandler};
pub use reply_generator::ReplyGenerator;
pub use select_option::{SelectOptionCommand, SelectOptionHandler, Selection};
pub use specialists::SpecialistPanel;
pub use synthesizer::RecommendationSynthesizer;
