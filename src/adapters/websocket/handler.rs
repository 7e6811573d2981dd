//! WebSocket upgrade handler for the voice/chat channel.
//!
//! Handles the HTTP → WebSocket upgrade and runs one planning session per
//! connection:
//! 1. Resolve the session id (query parameter, or a fresh one)
//! 2. Upgrade to WebSocket
//! 3. Answer each inbound frame in arrival order
//! 4. Stop when either side closes

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::adapters::http::trip::TripHandlers;
use crate::application::handlers::trip::{
    FetchOptionsCommand, FinalizeTripCommand, FinalizeTripResult, ProcessMessageCommand,
    SelectOptionCommand, Selection, SessionSnapshot, TripHandlerError, TurnOutcome,
};
use crate::domain::conversation::replies;
use crate::domain::foundation::SessionId;
use crate::domain::trip::{CollectedInfo, Stage};

use super::messages::{BotResponseMessage, ClientMessage, ServerMessage};

/// Outbound frames buffered per connection.
const OUTBOUND_BUFFER: usize = 32;

#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    pub session_id: Option<String>,
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws/voice?session_id=...`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<VoiceQuery>,
    State(handlers): State<TripHandlers>,
) -> Response {
    let session_id = match query.session_id {
        Some(raw) => match raw.parse::<SessionId>() {
            Ok(id) => id,
            Err(_) => return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response(),
        },
        None => SessionId::new(),
    };

    ws.on_upgrade(move |socket| handle_socket(socket, session_id, handlers))
}

/// Runs for the lifetime of the connection.
async fn handle_socket(socket: WebSocket, session_id: SessionId, handlers: TripHandlers) {
    tracing::info!(%session_id, "voice channel connected");
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(kind = msg.kind(), "failed to encode frame: {}", e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(json)).await {
                tracing::debug!("Send error, closing connection: {}", e);
                break;
            }
        }
    });

    let recv_session = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    for msg in handle_frame(&handlers, &recv_session, &text).await {
                        if tx.send(msg).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(session_id = %recv_session, "Received unsupported binary message");
                    if tx
                        .send(ServerMessage::error("Binary frames are not supported"))
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(session_id = %recv_session, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(session_id = %recv_session, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => {
            // drain frames already queued
            let _ = send_task.await;
        }
    }

    tracing::info!(%session_id, "voice channel closed");
}

/// Decodes one text frame and answers it.
pub async fn handle_frame(
    handlers: &TripHandlers,
    session_id: &SessionId,
    text: &str,
) -> Vec<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => respond(handlers, session_id, msg).await,
        Err(e) => {
            tracing::warn!(%session_id, error = %e, "undecodable frame");
            vec![ServerMessage::error(format!("Invalid message: {}", e))]
        }
    }
}

/// Produces the outbound frames for one inbound message, in send order.
pub async fn respond(
    handlers: &TripHandlers,
    session_id: &SessionId,
    msg: ClientMessage,
) -> Vec<ServerMessage> {
    let result = match msg {
        ClientMessage::UserMessage { message, persona } => {
            let cmd = ProcessMessageCommand {
                session_id: session_id.clone(),
                message,
                persona,
            };
            match handlers.process_message.handle(cmd).await {
                Ok(turn) => Ok(with_options(handlers, turn).await),
                Err(err) => Err(err),
            }
        }
        ClientMessage::SelectFlight { flight } => {
            select(handlers, session_id, Selection::Flight(flight)).await
        }
        ClientMessage::SelectHotel { hotel } => {
            select(handlers, session_id, Selection::Hotel(hotel)).await
        }
        ClientMessage::SelectActivity { activity } => {
            select(handlers, session_id, Selection::Activity(activity)).await
        }
        ClientMessage::Finalize => {
            let cmd = FinalizeTripCommand {
                session_id: session_id.clone(),
            };
            let result = match handlers.finalize_trip.handle(cmd).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(%session_id, error = %err, "finalize failed, sending fallback plan");
                    let info = last_known(handlers, session_id)
                        .await
                        .map(|snapshot| snapshot.collected_info)
                        .unwrap_or_default();
                    FinalizeTripResult::fallback(session_id.clone(), info)
                }
            };
            return vec![
                ServerMessage::BotResponse(result.turn.into()),
                ServerMessage::PlanningResult(result.plan.into()),
            ];
        }
    };

    match result {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(%session_id, error = %err, "turn failed");
            vec![ServerMessage::BotResponse(turn_failed(handlers, session_id).await)]
        }
    }
}

/// Stored view of the session, if the store can still produce one.
async fn last_known(handlers: &TripHandlers, session_id: &SessionId) -> Option<SessionSnapshot> {
    handlers.get_session.handle(session_id).await.ok()
}

/// Apology over the last known state of the session.
async fn turn_failed(handlers: &TripHandlers, session_id: &SessionId) -> BotResponseMessage {
    let message = replies::TURN_FAILED.to_string();
    match last_known(handlers, session_id).await {
        Some(snapshot) => BotResponseMessage {
            message,
            collected_info: snapshot.collected_info,
            current_stage: snapshot.current_stage,
            is_complete: snapshot.is_complete,
        },
        None => BotResponseMessage {
            message,
            collected_info: CollectedInfo::new(),
            current_stage: Stage::Greeting,
            is_complete: false,
        },
    }
}

async fn select(
    handlers: &TripHandlers,
    session_id: &SessionId,
    selection: Selection,
) -> Result<Vec<ServerMessage>, TripHandlerError> {
    let cmd = SelectOptionCommand {
        session_id: session_id.clone(),
        selection,
    };
    let turn = handlers.select_option.handle(cmd).await?;
    Ok(with_options(handlers, turn).await)
}

/// The turn's `bot_response`, followed by the options it signalled.
async fn with_options(handlers: &TripHandlers, turn: TurnOutcome) -> Vec<ServerMessage> {
    let signal = turn.signal;
    let cmd = signal.map(|category| FetchOptionsCommand {
        session_id: turn.session_id.clone(),
        category,
        expected_revision: turn.revision,
    });

    let mut out = vec![ServerMessage::BotResponse(BotResponseMessage::from(turn))];
    if let Some(cmd) = cmd {
        match handlers.fetch_options.handle(cmd).await {
            Ok(batch) => out.push(ServerMessage::ShowOptions(batch)),
            Err(TripHandlerError::Stale(id)) => {
                tracing::info!(session_id = %id, "session moved on, options dropped");
            }
            Err(err) => {
                tracing::error!(error = %err, "options fetch failed");
                out.push(ServerMessage::error(err.to_string()));
            }
        }
    }
    out
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router(handlers: TripHandlers) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/ws/voice", get(ws_handler))
        .with_state(handlers)
}
