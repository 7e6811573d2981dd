//! WebSocket message types for the voice/chat channel.
//!
//! Every frame is a JSON object tagged by `type`:
//! - Client → Server: `user_message`, `select_flight`, `select_hotel`,
//!   `select_activity`, `finalize`
//! - Server → Client: `bot_response`, `show_options`, `planning_result`, `error`

use serde::{Deserialize, Serialize};

use crate::application::handlers::trip::{OptionsBatch, TurnOutcome};
use crate::domain::planning::{Argument, BudgetSummary, FinalDecision, PlanningResult};
use crate::domain::trip::{CollectedInfo, OptionRecord, Persona, Stage};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to a state-mutating message.
    BotResponse(BotResponseMessage),

    /// Options for the category the last turn signalled.
    ShowOptions(OptionsBatch),

    /// Synthesized plan, sent after `finalize`.
    PlanningResult(PlanningResultMessage),

    /// Inbound frame could not be handled.
    Error(ErrorMessage),
}

#[derive(Debug, Clone, Serialize)]
pub struct BotResponseMessage {
    pub message: String,
    pub collected_info: CollectedInfo,
    pub current_stage: Stage,
    pub is_complete: bool,
}

impl From<TurnOutcome> for BotResponseMessage {
    fn from(turn: TurnOutcome) -> Self {
        Self {
            message: turn.message,
            collected_info: turn.collected_info,
            current_stage: turn.current_stage,
            is_complete: turn.is_complete,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanningResultMessage {
    pub debate_transcript: Vec<Argument>,
    pub final_decision: FinalDecision,
    pub budget_summary: BudgetSummary,
}

impl From<PlanningResult> for PlanningResultMessage {
    fn from(plan: PlanningResult) -> Self {
        Self {
            debate_transcript: plan.debate_transcript,
            final_decision: plan.final_decision,
            budget_summary: plan.budget_summary,
        }
    }
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            message: message.into(),
        })
    }

    /// Wire name of this message's `type`.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::BotResponse(_) => "bot_response",
            ServerMessage::ShowOptions(_) => "show_options",
            ServerMessage::PlanningResult(_) => "planning_result",
            ServerMessage::Error(_) => "error",
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    UserMessage {
        message: String,
        #[serde(default)]
        persona: Option<Persona>,
    },
    SelectFlight {
        flight: OptionRecord,
    },
    SelectHotel {
        hotel: OptionRecord,
    },
    SelectActivity {
        activity: OptionRecord,
    },
    Finalize,
}
