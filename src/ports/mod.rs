//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - text generation for replies and itinerary synthesis
//! - `TravelProvider` - flight, hotel and activity search
//! - `SessionStore` - session persistence with optimistic revisions

mod ai_provider;
mod session_store;
mod travel_provider;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message, MessageRole,
    ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use session_store::{SessionStore, SessionStoreError};
pub use travel_provider::{ProviderError, TravelProvider};
