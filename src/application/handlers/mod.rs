//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod trip;

pub use trip::{
    // Commands and handlers
    FetchOptionsCommand, FetchOptionsHandler,
    FinalizeTripCommand, FinalizeTripHandler, FinalizeTripResult,
    GetSessionHandler, SessionSnapshot,
    ProcessMessageCommand, ProcessMessageHandler,
    SelectOptionCommand, SelectOptionHandler, Selection,
    // Results and errors
    OptionsBatch, OptionsSource, TripHandlerError, TurnOutcome,
    // Services
    RecommendationSynthesizer, ReplyGenerator,
};
