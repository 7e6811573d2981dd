//! Results and errors shared by the trip handlers.

use serde::Serialize;

use crate::domain::foundation::SessionId;
use crate::domain::trip::{CollectedInfo, OptionsCategory, Stage, TripSession};
use crate::ports::SessionStoreError;

/// What a state-mutating turn produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    pub message: String,
    pub collected_info: CollectedInfo,
    pub current_stage: Stage,
    pub is_complete: bool,
    /// Category whose options should be fetched and shown next, if any.
    #[serde(skip)]
    pub signal: Option<OptionsCategory>,
    /// Session revision after this turn was saved.
    #[serde(skip)]
    pub revision: u64,
}

impl TurnOutcome {
    pub fn from_session(
        session: &TripSession,
        message: impl Into<String>,
        signal: Option<OptionsCategory>,
    ) -> Self {
        Self {
            session_id: session.id().clone(),
            message: message.into(),
            collected_info: session.info().clone(),
            current_stage: session.stage(),
            is_complete: session.is_complete(),
            signal,
            revision: session.revision(),
        }
    }

    pub fn should_show_options(&self) -> bool {
        self.signal.is_some()
    }
}

/// Errors from trip handlers.
#[derive(Debug, thiserror::Error)]
pub enum TripHandlerError {
    /// Another turn saved the session first; this turn's result was dropped.
    #[error("session {0} was updated concurrently, please retry")]
    Stale(SessionId),

    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session store error: {0}")]
    Store(SessionStoreError),
}

impl From<SessionStoreError> for TripHandlerError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::RevisionConflict { session_id, .. } => {
                TripHandlerError::Stale(session_id)
            }
            other => TripHandlerError::Store(other),
        }
    }
}

/// Saves `session`, logging and mapping a revision conflict.
pub(crate) async fn save_or_discard(
    store: &dyn crate::ports::SessionStore,
    session: &mut TripSession,
) -> Result<(), TripHandlerError> {
    store.save(session).await.map_err(|err| {
        if let SessionStoreError::RevisionConflict {
            expected, actual, ..
        } = &err
        {
            tracing::warn!(
                session_id = %session.id(),
                expected,
                actual,
                "discarding stale turn result"
            );
        }
        TripHandlerError::from(err)
    })
}
