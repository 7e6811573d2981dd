//! Travel Provider Port - Interface for flight, hotel and activity search.
//!
//! Results are normalized provider records (`OptionRecord`). Adapters map
//! their vendor payloads into the shared field names; the dialogue only reads
//! a few of them.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::trip::OptionRecord;

/// Travel provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Credentials for this provider are missing.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("invalid search: {0}")]
    InvalidRequest(String),

    #[error("authentication with provider failed")]
    AuthenticationFailed,

    #[error("provider quota exceeded")]
    RateLimited,

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected provider response: {0}")]
    Parse(String),

    #[error("no results: {0}")]
    NoResults(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Port for travel inventory searches.
#[async_trait]
pub trait TravelProvider: Send + Sync {
    /// One-way flights for a date. `origin` and `destination` are IATA codes.
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError>;

    /// Hotels with offers for the stay. `city` is an IATA city code.
    async fn search_hotels(
        &self,
        city: &str,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError>;

    /// Things to do in a city. `city` is an IATA city code.
    async fn search_activities(&self, city: &str) -> Result<Vec<OptionRecord>, ProviderError>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}
