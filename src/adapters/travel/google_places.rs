//! Google Places (New) text search adapter for activities.
//!
//! Queries "Tourist attractions in <city>" and normalizes each place into an
//! activity record `{id: GPLACE_NNN, name, location, address, duration, price,
//! time_of_day, category, rating, rating_count, opening_hours, persona_match}`.
//! Flights and hotels are not offered by this provider.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::trip::{City, OptionRecord, Persona};
use crate::ports::{ProviderError, TravelProvider};

const SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const FIELD_MASK: &str = "places.displayName,places.rating,places.formattedAddress,\
places.regularOpeningHours,places.primaryTypeDisplayName,places.userRatingCount";
const MAX_RESULTS: u32 = 10;
const MAX_HOURS_LINES: usize = 3;

#[derive(Debug, Clone)]
pub struct GooglePlacesConfig {
    api_key: Secret<String>,
    pub search_url: String,
    pub timeout: Duration,
}

impl GooglePlacesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            search_url: SEARCH_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct GooglePlacesProvider {
    config: GooglePlacesConfig,
    client: Client,
}

impl GooglePlacesProvider {
    pub fn new(config: GooglePlacesConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }
}

/// Expands a city code or name to the region string used in the query.
fn region_for(city: &str) -> String {
    City::by_code(city)
        .or_else(|| City::find_in(city))
        .map(|c| c.region_name.to_string())
        .unwrap_or_else(|| format!("{}, India", city.trim()))
}

#[async_trait]
impl TravelProvider for GooglePlacesProvider {
    async fn search_flights(
        &self,
        _origin: &str,
        _destination: &str,
        _date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        Err(ProviderError::NotConfigured("google places flight search"))
    }

    async fn search_hotels(
        &self,
        _city: &str,
        _check_in: Option<NaiveDate>,
        _check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        Err(ProviderError::NotConfigured("google places hotel search"))
    }

    async fn search_activities(&self, city: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        let region = region_for(city);
        let body = SearchTextRequest {
            text_query: format!("Tourist attractions in {}", region),
            max_result_count: MAX_RESULTS,
            language_code: "en",
        };
        tracing::info!(query = %body.text_query, "searching google places");

        let response = self
            .client
            .post(&self.config.search_url)
            .header("X-Goog-Api-Key", self.config.api_key.expose_secret())
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Unavailable("google places request timed out".into())
                } else {
                    ProviderError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => ProviderError::InvalidRequest(text),
                401 | 403 => ProviderError::AuthenticationFailed,
                429 => ProviderError::RateLimited,
                _ => ProviderError::Unavailable(format!("status {}: {}", status, text)),
            });
        }

        let parsed: SearchTextResponse = response.json().await?;
        if parsed.places.is_empty() {
            return Err(ProviderError::NoResults(format!("no places found for {}", region)));
        }
        Ok(normalize_places(parsed.places, city))
    }

    fn name(&self) -> &'static str {
        "google_places"
    }
}

fn normalize_places(places: Vec<Place>, city: &str) -> Vec<OptionRecord> {
    let personas: Vec<&str> = Persona::ALL.iter().map(|p| p.as_str()).collect();
    places
        .into_iter()
        .enumerate()
        .filter_map(|(i, place)| {
            OptionRecord::new(json!({
                "id": format!("GPLACE_{:03}", i + 1),
                "name": place.display_name.map(|n| n.text).unwrap_or_else(|| "Unknown Place".into()),
                "location": city,
                "address": place.formatted_address.unwrap_or_default(),
                "duration": "2 hours",
                "price": 0,
                "time_of_day": "morning",
                "category": place.primary_type_display_name.map(|n| n.text).unwrap_or_else(|| "Attraction".into()),
                "rating": place.rating.unwrap_or(0.0),
                "rating_count": place.user_rating_count.unwrap_or(0),
                "opening_hours": opening_hours(place.regular_opening_hours.as_ref()),
                "persona_match": personas,
            }))
            .ok()
        })
        .collect()
}

fn opening_hours(hours: Option<&OpeningHours>) -> String {
    let Some(hours) = hours else {
        return "Hours not available".to_string();
    };
    if !hours.weekday_descriptions.is_empty() {
        return hours
            .weekday_descriptions
            .iter()
            .take(MAX_HOURS_LINES)
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ");
    }
    match hours.open_now {
        Some(true) => "Currently open".to_string(),
        Some(false) => "Currently closed".to_string(),
        None => "Hours not available".to_string(),
    }
}

// ----- Places API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest {
    text_query: String,
    max_result_count: u32,
    language_code: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u64>,
    primary_type_display_name: Option<LocalizedText>,
    regular_opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_descriptions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(value: serde_json::Value) -> Vec<Place> {
        serde_json::from_value::<SearchTextResponse>(value).unwrap().places
    }

    #[test]
    fn region_expands_codes_and_names() {
        assert_eq!(region_for("DEL"), "New Delhi, India");
        assert_eq!(region_for("cochin"), "Kochi, India");
        assert_eq!(region_for("Shimla"), "Shimla, India");
    }

    #[test]
    fn places_get_sequential_ids() {
        let records = normalize_places(
            places(json!({"places": [
                {"displayName": {"text": "Baga Beach"}, "rating": 4.4, "userRatingCount": 1200},
                {"displayName": {"text": "Fort Aguada"}}
            ]})),
            "GOI",
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id().as_deref(), Some("GPLACE_001"));
        assert_eq!(records[1].id().as_deref(), Some("GPLACE_002"));
        assert_eq!(records[0].text("name"), Some("Baga Beach"));
        assert_eq!(records[0].price(), Some(0.0));
        assert_eq!(records[1].text("category"), Some("Attraction"));
        assert_eq!(records[1].text("location"), Some("GOI"));
        assert_eq!(records[0].as_value()["persona_match"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn opening_hours_prefers_weekday_lines() {
        let hours: OpeningHours = serde_json::from_value(json!({
            "openNow": true,
            "weekdayDescriptions": ["Mon: 9-5", "Tue: 9-5", "Wed: 9-5", "Thu: 9-5"]
        }))
        .unwrap();
        assert_eq!(
            opening_hours(Some(&hours)),
            "Mon: 9-5 | Tue: 9-5 | Wed: 9-5"
        );
    }

    #[test]
    fn opening_hours_falls_back_to_open_flag() {
        let open: OpeningHours = serde_json::from_value(json!({"openNow": false})).unwrap();
        assert_eq!(opening_hours(Some(&open)), "Currently closed");
        assert_eq!(opening_hours(None), "Hours not available");
    }
}
