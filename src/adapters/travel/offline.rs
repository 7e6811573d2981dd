//! Provider used when no travel credentials are configured.
//!
//! Every search fails with `NotConfigured`, which routes callers to the local
//! fallback dataset.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::trip::OptionRecord;
use crate::ports::{ProviderError, TravelProvider};

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTravelProvider;

#[async_trait]
impl TravelProvider for OfflineTravelProvider {
    async fn search_flights(
        &self,
        _origin: &str,
        _destination: &str,
        _date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        Err(ProviderError::NotConfigured("flight search"))
    }

    async fn search_hotels(
        &self,
        _city: &str,
        _check_in: Option<NaiveDate>,
        _check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        Err(ProviderError::NotConfigured("hotel search"))
    }

    async fn search_activities(&self, _city: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        Err(ProviderError::NotConfigured("activity search"))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
