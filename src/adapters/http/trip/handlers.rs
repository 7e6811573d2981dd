//! HTTP handlers for the trip planning endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::trip::{
    FetchOptionsHandler, FinalizeTripHandler, GetSessionHandler, ProcessMessageCommand,
    ProcessMessageHandler, SelectOptionHandler, TripHandlerError,
};
use crate::domain::foundation::SessionId;
use crate::ports::{AIProvider, SessionStore, TravelProvider};

use super::dto::{ChatErrorResponse, ChatRequest, ChatResponse, ErrorResponse, StatusResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Application handlers shared by the HTTP and WebSocket surfaces.
#[derive(Clone)]
pub struct TripHandlers {
    pub(crate) process_message: Arc<ProcessMessageHandler>,
    pub(crate) select_option: Arc<SelectOptionHandler>,
    pub(crate) fetch_options: Arc<FetchOptionsHandler>,
    pub(crate) finalize_trip: Arc<FinalizeTripHandler>,
    pub(crate) get_session: Arc<GetSessionHandler>,
}

impl TripHandlers {
    /// Wires every handler to the same store and providers.
    ///
    /// `fallback` serves searches whenever `travel` fails or finds nothing.
    pub fn new(
        store: Arc<dyn SessionStore>,
        ai: Arc<dyn AIProvider>,
        travel: Arc<dyn TravelProvider>,
        fallback: Arc<dyn TravelProvider>,
    ) -> Self {
        Self {
            process_message: Arc::new(ProcessMessageHandler::new(store.clone(), ai.clone())),
            select_option: Arc::new(SelectOptionHandler::new(store.clone())),
            fetch_options: Arc::new(FetchOptionsHandler::new(store.clone(), travel, fallback)),
            finalize_trip: Arc::new(FinalizeTripHandler::new(store.clone(), ai)),
            get_session: Arc::new(GetSessionHandler::new(store)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ChatError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Handler(#[from] TripHandlerError),
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET / - Service status
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::default())
}

/// POST /api/chat - Process one user message
///
/// Always answers 200; failures are described in the body.
pub async fn chat(
    State(handlers): State<TripHandlers>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    match process_chat(&handlers, payload).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "chat request failed");
            Json(ChatErrorResponse::new(err)).into_response()
        }
    }
}

async fn process_chat(
    handlers: &TripHandlers,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ChatResponse, ChatError> {
    let Json(req) = payload.map_err(|e| ChatError::InvalidRequest(e.body_text()))?;
    let session_id: SessionId = req
        .session_id
        .parse()
        .map_err(|e| ChatError::InvalidRequest(format!("{}", e)))?;

    let cmd = ProcessMessageCommand {
        session_id,
        message: req.message,
        persona: req.persona,
    };
    let turn = handlers.process_message.handle(cmd).await?;
    Ok(ChatResponse::from(turn))
}

/// GET /api/sessions/:session_id - Session snapshot
pub async fn get_session(
    State(handlers): State<TripHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        }
    };

    match handlers.get_session.handle(&session_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(TripHandlerError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", id.as_str())),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "session lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(err.to_string())),
            )
                .into_response()
        }
    }
}
