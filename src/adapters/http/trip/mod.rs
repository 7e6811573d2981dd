//! HTTP adapter for the trip planning endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatErrorResponse, ChatReply, ChatRequest, ChatResponse, Endpoints, ErrorResponse,
    StatusResponse,
};
pub use handlers::TripHandlers;
pub use routes::trip_routes;
