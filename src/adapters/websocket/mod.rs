//! WebSocket adapter for the voice/chat channel.
//!
//! One connection drives one planning session. Each inbound frame yields a
//! `bot_response` (or an `error`), followed by `show_options` when the turn
//! signalled a category, or by `planning_result` after `finalize`.
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler and per-frame dispatch

pub mod handler;
pub mod messages;

pub use handler::{handle_frame, respond, websocket_router, ws_handler, VoiceQuery};
pub use messages::{
    BotResponseMessage, ClientMessage, ErrorMessage, PlanningResultMessage, ServerMessage,
};
