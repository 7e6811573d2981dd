//! HTTP adapters - REST API implementations.

pub mod trip;

pub use trip::{trip_routes, TripHandlers};

use axum::Router;

use crate::adapters::websocket::websocket_router;

/// The full API surface: status, chat, session snapshot and the voice channel.
pub fn api_router(handlers: TripHandlers) -> Router {
    trip_routes(handlers.clone()).merge(websocket_router(handlers))
}
