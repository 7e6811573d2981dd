//! In-Memory Session Store Adapter
//!
//! Keeps sessions in a process-local map. Sessions live until the process
//! exits. Used in development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::trip::TripSession;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for planning sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, TripSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<TripSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: &mut TripSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get(session.id()).map_or(0, TripSession::revision);
        if stored != session.revision() {
            return Err(SessionStoreError::RevisionConflict {
                session_id: session.id().clone(),
                expected: session.revision(),
                actual: stored,
            });
        }

        session.mark_saved(stored + 1);
        sessions.insert(session.id().clone(), session.clone());
        Ok(())
    }
}
