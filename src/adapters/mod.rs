//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - text generation (OpenAI, Azure OpenAI, retry wrapper, mock)
//! - `travel` - flight, hotel and activity search (Amadeus, Google Places,
//!   embedded fallback dataset, mock)
//! - `storage` - session stores (in-memory, Redis)
//! - `http` - REST endpoints
//! - `websocket` - the voice/chat channel

pub mod ai;
pub mod http;
pub mod storage;
pub mod travel;
pub mod websocket;
