//! Routes each search category to a dedicated provider.
//!
//! The usual wiring sends flights and hotels to Amadeus and activities to
//! Google Places.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::trip::OptionRecord;
use crate::ports::{ProviderError, TravelProvider};

pub struct RoutedTravelProvider {
    inventory: Arc<dyn TravelProvider>,
    activities: Arc<dyn TravelProvider>,
}

impl RoutedTravelProvider {
    /// `inventory` serves flights and hotels; `activities` serves activities.
    pub fn new(inventory: Arc<dyn TravelProvider>, activities: Arc<dyn TravelProvider>) -> Self {
        Self {
            inventory,
            activities,
        }
    }
}

#[async_trait]
impl TravelProvider for RoutedTravelProvider {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        self.inventory.search_flights(origin, destination, date).await
    }

    async fn search_hotels(
        &self,
        city: &str,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        self.inventory.search_hotels(city, check_in, check_out).await
    }

    async fn search_activities(&self, city: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        self.activities.search_activities(city).await
    }

    fn name(&self) -> &'static str {
        "routed"
    }
}
