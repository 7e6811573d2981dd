//! HTTP DTOs for the trip planning endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::trip::TurnOutcome;
use crate::domain::trip::{CollectedInfo, OptionsCategory, Persona, Stage};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    #[serde(default)]
    pub persona: Option<Persona>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The assistant's side of one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub collected_info: CollectedInfo,
    pub current_stage: Stage,
    /// Category the client should now offer, if any.
    pub should_show_options: Option<OptionsCategory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: ChatReply,
    pub collected_info: CollectedInfo,
    pub is_complete: bool,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(turn: TurnOutcome) -> Self {
        Self {
            collected_info: turn.collected_info.clone(),
            is_complete: turn.is_complete,
            response: ChatReply {
                message: turn.message,
                collected_info: turn.collected_info,
                current_stage: turn.current_stage,
                should_show_options: turn.signal,
            },
        }
    }
}

/// Chat failures are reported in-band with a 200 status.
#[derive(Debug, Clone, Serialize)]
pub struct ChatErrorResponse {
    pub response: String,
    pub collected_info: serde_json::Map<String, serde_json::Value>,
    pub is_complete: bool,
}

impl ChatErrorResponse {
    pub fn new(description: impl std::fmt::Display) -> Self {
        Self {
            response: format!("Error: {}", description),
            collected_info: serde_json::Map::new(),
            is_complete: false,
        }
    }
}

/// Error body for the non-chat endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub chat: &'static str,
    pub session: &'static str,
    pub websocket: &'static str,
}

impl Default for StatusResponse {
    fn default() -> Self {
        Self {
            status: "Trip Planner API is running",
            version: env!("CARGO_PKG_VERSION"),
            endpoints: Endpoints {
                chat: "/api/chat",
                session: "/api/sessions/:session_id",
                websocket: "/ws/voice",
            },
        }
    }
}
