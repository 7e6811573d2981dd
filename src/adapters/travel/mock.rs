//! Mock travel provider for testing.
//!
//! Each category returns its configured records, or a configured error.
//! Categories left unconfigured fail with `NoResults`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::trip::OptionRecord;
use crate::ports::{ProviderError, TravelProvider};

#[derive(Debug, Clone, Default)]
enum Canned {
    #[default]
    Unset,
    Records(Vec<OptionRecord>),
    Unavailable(String),
}

impl Canned {
    fn produce(&self, category: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        match self {
            Canned::Records(records) => Ok(records.clone()),
            Canned::Unset => Err(ProviderError::NoResults(format!("no {} configured", category))),
            Canned::Unavailable(message) => Err(ProviderError::Unavailable(message.clone())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockTravelProvider {
    flights: Canned,
    hotels: Canned,
    activities: Canned,
    calls: Arc<AtomicUsize>,
}

impl MockTravelProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flights(mut self, records: Vec<OptionRecord>) -> Self {
        self.flights = Canned::Records(records);
        self
    }

    pub fn with_hotels(mut self, records: Vec<OptionRecord>) -> Self {
        self.hotels = Canned::Records(records);
        self
    }

    pub fn with_activities(mut self, records: Vec<OptionRecord>) -> Self {
        self.activities = Canned::Records(records);
        self
    }

    /// Makes hotel searches fail as if the provider were down.
    pub fn with_failing_hotels(mut self, message: impl Into<String>) -> Self {
        self.hotels = Canned::Unavailable(message.into());
        self
    }

    /// Makes flight searches fail as if the provider were down.
    pub fn with_failing_flights(mut self, message: impl Into<String>) -> Self {
        self.flights = Canned::Unavailable(message.into());
        self
    }

    /// Number of searches made, across all categories and clones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TravelProvider for MockTravelProvider {
    async fn search_flights(
        &self,
        _origin: &str,
        _destination: &str,
        _date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.flights.produce("flights")
    }

    async fn search_hotels(
        &self,
        _city: &str,
        _check_in: Option<NaiveDate>,
        _check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hotels.produce("hotels")
    }

    async fn search_activities(&self, _city: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.activities.produce("activities")
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
