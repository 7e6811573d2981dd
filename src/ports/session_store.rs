//! Session Store Port - Interface for persisting planning sessions.
//!
//! Saves are optimistic: each session carries the revision it was loaded at,
//! and a save only succeeds if the stored copy is still at that revision.
//! A rejected save means another turn got there first; the caller discards
//! its result.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::trip::TripSession;

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session {session_id} changed concurrently (expected revision {expected}, found {actual})")]
    RevisionConflict {
        session_id: SessionId,
        expected: u64,
        actual: u64,
    },

    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("Session backend error: {0}")]
    Backend(String),
}

/// Port for loading and saving planning sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, or `None` if it does not exist (or has expired).
    async fn load(&self, id: &SessionId) -> Result<Option<TripSession>, SessionStoreError>;

    /// Save a session if the stored revision still matches `session.revision()`.
    ///
    /// On success the session's revision is advanced to the stored revision.
    ///
    /// # Errors
    /// `RevisionConflict` if another save happened since this copy was loaded.
    async fn save(&self, session: &mut TripSession) -> Result<(), SessionStoreError>;

    /// Load a session, starting a fresh one if none exists.
    async fn load_or_create(&self, id: &SessionId) -> Result<TripSession, SessionStoreError> {
        Ok(self
            .load(id)
            .await?
            .unwrap_or_else(|| TripSession::new(id.clone())))
    }
}
