//! TripSession aggregate - one planning conversation.

use serde::{Deserialize, Serialize};

use super::{CollectedInfo, Stage};
use crate::domain::foundation::{SessionId, StateMachine, Timestamp};

/// Oldest turns are dropped beyond this many.
pub const MAX_HISTORY_TURNS: usize = 40;

/// Who spoke a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One utterance in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub at: Timestamp,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            at: Timestamp::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            at: Timestamp::now(),
        }
    }
}

/// A planning session: collected facts, dialogue stage and history.
///
/// `revision` counts successful saves. Stores use it for optimistic
/// concurrency: a save is accepted only if the stored revision still equals
/// the revision this copy was loaded at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSession {
    id: SessionId,
    info: CollectedInfo,
    stage: Stage,
    history: Vec<ChatTurn>,
    revision: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TripSession {
    /// Starts a fresh session at `greeting` with nothing collected.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            info: CollectedInfo::new(),
            stage: Stage::Greeting,
            history: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn info(&self) -> &CollectedInfo {
        &self.info
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_complete(&self) -> bool {
        self.info.is_complete()
    }

    /// Replaces the collected facts and moves the stage forward.
    ///
    /// A target earlier than the current stage leaves the stage unchanged.
    pub fn apply(&mut self, info: CollectedInfo, stage: Stage) {
        self.info = info;
        if self.stage.can_transition_to(&stage) {
            self.stage = stage;
        }
        self.updated_at = Timestamp::now();
    }

    /// Appends a user message and the assistant's reply.
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(ChatTurn::user(user));
        self.history.push(ChatTurn::assistant(assistant));
        if self.history.len() > MAX_HISTORY_TURNS {
            let excess = self.history.len() - MAX_HISTORY_TURNS;
            self.history.drain(..excess);
        }
        self.updated_at = Timestamp::now();
    }

    /// Called by a store once this copy has been persisted.
    pub fn mark_saved(&mut self, revision: u64) {
        self.revision = revision;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TripSession {
        TripSession::new("s-1".parse().unwrap())
    }

    #[test]
    fn new_session_starts_at_greeting() {
        let s = session();
        assert_eq!(s.stage(), Stage::Greeting);
        assert_eq!(s.revision(), 0);
        assert!(s.history().is_empty());
        assert!(!s.is_complete());
    }

    #[test]
    fn apply_never_regresses_stage() {
        let mut s = session();
        s.apply(CollectedInfo::new(), Stage::Hotels);
        s.apply(CollectedInfo::new(), Stage::Flights);
        assert_eq!(s.stage(), Stage::Hotels);
    }

    #[test]
    fn apply_replaces_info() {
        let mut s = session();
        let mut info = CollectedInfo::new();
        info.budget = Some(40000);
        s.apply(info, Stage::Greeting);
        assert_eq!(s.info().budget, Some(40000));
    }

    #[test]
    fn record_exchange_keeps_order() {
        let mut s = session();
        s.record_exchange("hi", "Hi! Where are you traveling from?");
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.history()[0].role, TurnRole::User);
        assert_eq!(s.history()[1].role, TurnRole::Assistant);
    }

    #[test]
    fn history_is_bounded() {
        let mut s = session();
        for i in 0..(MAX_HISTORY_TURNS) {
            s.record_exchange(format!("u{}", i), format!("a{}", i));
        }
        assert_eq!(s.history().len(), MAX_HISTORY_TURNS);
        assert_eq!(s.history().last().unwrap().content, format!("a{}", MAX_HISTORY_TURNS - 1));
    }

    #[test]
    fn round_trips_through_json() {
        let mut s = session();
        s.record_exchange("from bangalore", "Great!");
        s.mark_saved(3);
        let json = serde_json::to_string(&s).unwrap();
        let back: TripSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.revision(), 3);
    }
}
