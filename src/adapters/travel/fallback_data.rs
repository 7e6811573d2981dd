//! Local fallback dataset embedded in the binary.
//!
//! Used whenever a live provider search fails. Flights are a generic list,
//! hotels are keyed by IATA city code, and activities carry a `location` city
//! name used for filtering.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::domain::trip::{City, OptionRecord};
use crate::ports::{ProviderError, TravelProvider};

const FLIGHTS_JSON: &str = include_str!("../../../data/flights.json");
const HOTELS_JSON: &str = include_str!("../../../data/hotels.json");
const ACTIVITIES_JSON: &str = include_str!("../../../data/activities.json");

#[derive(Debug, Default)]
pub struct FallbackDataset {
    flights: Vec<OptionRecord>,
    hotels: HashMap<String, Vec<OptionRecord>>,
    activities: Vec<OptionRecord>,
}

#[derive(Deserialize)]
struct FlightsFile {
    flights: Vec<OptionRecord>,
}

#[derive(Deserialize)]
struct ActivitiesFile {
    activities: Vec<OptionRecord>,
}

static DATASET: Lazy<FallbackDataset> = Lazy::new(|| {
    FallbackDataset::parse(FLIGHTS_JSON, HOTELS_JSON, ACTIVITIES_JSON).unwrap_or_else(|err| {
        tracing::error!(error = %err, "embedded fallback dataset is invalid");
        FallbackDataset::default()
    })
});

impl FallbackDataset {
    /// The dataset compiled into the binary.
    pub fn embedded() -> &'static FallbackDataset {
        &DATASET
    }

    pub fn parse(flights: &str, hotels: &str, activities: &str) -> Result<Self, serde_json::Error> {
        let flights: FlightsFile = serde_json::from_str(flights)?;
        let hotels: HashMap<String, Vec<OptionRecord>> = serde_json::from_str(hotels)?;
        let activities: ActivitiesFile = serde_json::from_str(activities)?;
        Ok(Self {
            flights: flights.flights,
            hotels: hotels
                .into_iter()
                .map(|(code, list)| (code.to_ascii_uppercase(), list))
                .collect(),
            activities: activities.activities,
        })
    }

    pub fn flights(&self) -> Vec<OptionRecord> {
        self.flights.clone()
    }

    /// Hotels for a city code; empty for unknown cities.
    pub fn hotels(&self, city: &str) -> Vec<OptionRecord> {
        self.hotels
            .get(&city.trim().to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Activities whose `location` names the destination (by city name or
    /// code). Every activity is returned when none match.
    pub fn activities(&self, destination: &str) -> Vec<OptionRecord> {
        let wanted = destination.trim();
        let city_name = City::by_code(wanted).map(|c| c.name);
        let matches: Vec<OptionRecord> = self
            .activities
            .iter()
            .filter(|a| {
                a.text("location").is_some_and(|loc| {
                    loc.eq_ignore_ascii_case(wanted)
                        || city_name.is_some_and(|name| loc.eq_ignore_ascii_case(name))
                })
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            self.activities.clone()
        } else {
            matches
        }
    }
}

/// Serves searches from the embedded dataset. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTravelProvider;

#[async_trait]
impl TravelProvider for FallbackTravelProvider {
    async fn search_flights(
        &self,
        _origin: &str,
        _destination: &str,
        _date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        Ok(FallbackDataset::embedded().flights())
    }

    async fn search_hotels(
        &self,
        city: &str,
        _check_in: Option<NaiveDate>,
        _check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        Ok(FallbackDataset::embedded().hotels(city))
    }

    async fn search_activities(&self, city: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        Ok(FallbackDataset::embedded().activities(city))
    }

    fn name(&self) -> &'static str {
        "fallback_dataset"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_parses() {
        let data = FallbackDataset::parse(FLIGHTS_JSON, HOTELS_JSON, ACTIVITIES_JSON).unwrap();
        assert!(!data.flights.is_empty());
        assert_eq!(data.hotels.len(), 10);
        assert!(!data.activities.is_empty());
    }

    #[tokio::test]
    async fn provider_serves_dataset() {
        let provider = FallbackTravelProvider;
        let flights = provider.search_flights("BLR", "GOI", None).await.unwrap();
        assert_eq!(flights.len(), FallbackDataset::embedded().flights.len());
        let hotels = provider.search_hotels("GOI", None, None).await.unwrap();
        assert_eq!(hotels.len(), 5);
    }

    #[test]
    fn hotels_are_keyed_by_code() {
        let data = FallbackDataset::embedded();
        let hotels = data.hotels("jai");
        assert!(!hotels.is_empty());
        assert!(hotels.iter().all(|h| h.id().is_some_and(|id| id.starts_with("HTJAI"))));
        assert!(data.hotels("XYZ").is_empty());
    }

    #[test]
    fn activities_match_code_or_name() {
        let data = FallbackDataset::embedded();
        let by_code = data.activities("GOI");
        let by_name = data.activities("goa");
        assert_eq!(by_code, by_name);
        assert!(by_code.iter().all(|a| a.text("location") == Some("Goa")));
    }

    #[test]
    fn unknown_destination_gets_every_activity() {
        let data = FallbackDataset::embedded();
        assert_eq!(data.activities("Atlantis").len(), data.activities.len());
    }
}
