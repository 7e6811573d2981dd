//! GetSessionHandler - Read a session snapshot.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::SessionId;
use crate::domain::trip::{CollectedInfo, Stage};
use crate::ports::SessionStore;

use super::outcome::TripHandlerError;

/// Read model for `GET /api/sessions/:session_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub collected_info: CollectedInfo,
    pub current_stage: Stage,
    pub is_complete: bool,
}

pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, session_id: &SessionId) -> Result<SessionSnapshot, TripHandlerError> {
        let session = self
            .store
            .load(session_id)
            .await?
            .ok_or_else(|| TripHandlerError::NotFound(session_id.clone()))?;

        Ok(SessionSnapshot {
            session_id: session.id().clone(),
            collected_info: session.info().clone(),
            current_stage: session.stage(),
            is_complete: session.is_complete(),
        })
    }
}
