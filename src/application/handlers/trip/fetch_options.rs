//! FetchOptionsHandler - Search providers for the signalled category.
//!
//! A failed live search falls back to the local dataset. Results are capped
//! at the category display limit. If the session has moved on while the
//! search was in flight, the result is discarded.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::conversation::replies::options_caption;
use crate::domain::foundation::SessionId;
use crate::domain::trip::{CollectedInfo, OptionRecord, OptionsCategory};
use crate::ports::{ProviderError, SessionStore, TravelProvider};

use super::outcome::TripHandlerError;

#[derive(Debug, Clone)]
pub struct FetchOptionsCommand {
    pub session_id: SessionId,
    pub category: OptionsCategory,
    /// Session revision at the moment the options were signalled.
    pub expected_revision: u64,
}

/// Where a batch of options came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsSource {
    Provider,
    Fallback,
}

/// Options ready to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsBatch {
    pub options_type: OptionsCategory,
    pub options: Vec<OptionRecord>,
    pub message: String,
    #[serde(skip)]
    pub source: OptionsSource,
}

pub struct FetchOptionsHandler {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn TravelProvider>,
    fallback: Arc<dyn TravelProvider>,
}

impl FetchOptionsHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn TravelProvider>,
        fallback: Arc<dyn TravelProvider>,
    ) -> Self {
        Self {
            store,
            provider,
            fallback,
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(session_id = %cmd.session_id, category = %cmd.category))]
    pub async fn handle(&self, cmd: FetchOptionsCommand) -> Result<OptionsBatch, TripHandlerError> {
        let session = self
            .store
            .load(&cmd.session_id)
            .await?
            .ok_or_else(|| TripHandlerError::NotFound(cmd.session_id.clone()))?;
        let info = session.info();

        let (mut options, source) = match search(self.provider.as_ref(), cmd.category, info).await {
            Ok(options) if !options.is_empty() => (options, OptionsSource::Provider),
            Ok(_) => {
                tracing::warn!(provider = self.provider.name(), "provider returned nothing, using fallback dataset");
                (self.search_fallback(cmd.category, info).await, OptionsSource::Fallback)
            }
            Err(err) => {
                tracing::warn!(provider = self.provider.name(), error = %err, "provider search failed, using fallback dataset");
                (self.search_fallback(cmd.category, info).await, OptionsSource::Fallback)
            }
        };
        options.truncate(cmd.category.display_limit());

        let current = self
            .store
            .load(&cmd.session_id)
            .await?
            .map_or(0, |s| s.revision());
        if current != cmd.expected_revision {
            tracing::warn!(
                expected = cmd.expected_revision,
                actual = current,
                "discarding stale options"
            );
            return Err(TripHandlerError::Stale(cmd.session_id));
        }

        tracing::info!(count = options.len(), source = ?source, "options fetched");
        Ok(OptionsBatch {
            options_type: cmd.category,
            message: options_caption(cmd.category, options.len(), info),
            options,
            source,
        })
    }

    async fn search_fallback(&self, category: OptionsCategory, info: &CollectedInfo) -> Vec<OptionRecord> {
        search(self.fallback.as_ref(), category, info)
            .await
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, "fallback dataset search failed");
                Vec::new()
            })
    }
}

async fn search(
    provider: &dyn TravelProvider,
    category: OptionsCategory,
    info: &CollectedInfo,
) -> Result<Vec<OptionRecord>, ProviderError> {
    let destination = info.destination.as_deref().unwrap_or_default();
    match category {
        OptionsCategory::Flights => {
            let origin = info.departure_city.as_deref().unwrap_or_default();
            provider.search_flights(origin, destination, info.start_date).await
        }
        OptionsCategory::Hotels => {
            provider
                .search_hotels(destination, info.start_date, info.end_date)
                .await
        }
        OptionsCategory::Activities => provider.search_activities(destination).await,
    }
}
