//! HTTP routes for the trip planning endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, get_session, status, TripHandlers};

/// Creates the trip router: status, chat and session snapshot.
pub fn trip_routes(handlers: TripHandlers) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/api/chat", post(chat))
        .route("/api/sessions/:session_id", get(get_session))
        .with_state(handlers)
}
