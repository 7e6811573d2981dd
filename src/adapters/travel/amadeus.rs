//! Amadeus self-service adapter for flight and hotel search.
//!
//! Authenticates with the OAuth2 client-credentials flow and caches the access
//! token until shortly before it expires. Vendor payloads are normalized into
//! the shared option record shape:
//!
//! - flights: `{id, price, currency, departure_time, arrival_time, duration,
//!   stops, airline, departure_airport, arrival_airport, aircraft, cabin}`
//! - hotels: `{id, name, price_per_night, currency, rating, amenities, room_type}`
//!
//! EUR prices are converted to INR at a fixed rate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::trip::{City, OptionRecord};
use crate::ports::{ProviderError, TravelProvider};

pub const EUR_TO_INR: f64 = 107.22;

const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";
const MAX_FLIGHT_RESULTS: u32 = 5;
const MAX_HOTELS_PRICED: usize = 5;
const MAX_AMENITIES: usize = 5;
const MAX_ACTIVITIES: usize = 10;
/// Tokens are refreshed this long before their stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Configuration for the Amadeus adapter.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    api_key: Secret<String>,
    api_secret: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl AmadeusConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_secret: Secret::new(api_secret.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Amadeus travel provider.
pub struct AmadeusProvider {
    config: AmadeusConfig,
    client: Client,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl AmadeusProvider {
    pub fn new(config: AmadeusConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Returns a cached access token, fetching a new one when needed.
    async fn access_token(&self) -> Result<String, ProviderError> {
        {
            let cache = self.token.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let response = self
            .client
            .post(self.url("/v1/security/oauth2/token"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.api_key.expose_secret().as_str()),
                ("client_secret", self.config.api_secret.expose_secret().as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = check_status(response).await?.json().await?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let mut cache = self.token.write().await;
        *cache = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        tracing::debug!(expires_in = token.expires_in, "amadeus token refreshed");

        Ok(token.access_token)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        match check_status(response).await {
            Ok(response) => Ok(response.json().await?),
            Err(ProviderError::AuthenticationFailed) => {
                // Token revoked early; the next call fetches a fresh one.
                *self.token.write().await = None;
                Err(ProviderError::AuthenticationFailed)
            }
            Err(err) => Err(err),
        }
    }

    async fn price_hotel(
        &self,
        hotel_id: &str,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<Option<OptionRecord>, ProviderError> {
        let mut query = vec![("hotelIds", hotel_id.to_string()), ("adults", "1".to_string())];
        if let Some(date) = check_in {
            query.push(("checkInDate", date.to_string()));
        }
        if let Some(date) = check_out {
            query.push(("checkOutDate", date.to_string()));
        }

        let offers: HotelOffersResponse = self.get_json("/v3/shopping/hotel-offers", &query).await?;
        Ok(offers
            .data
            .into_iter()
            .next()
            .and_then(|set| normalize_hotel_offer(hotel_id, set)))
    }
}

#[async_trait]
impl TravelProvider for AmadeusProvider {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        if origin.is_empty() || destination.is_empty() {
            return Err(ProviderError::InvalidRequest("invalid city codes".into()));
        }
        let date = date.ok_or_else(|| ProviderError::InvalidRequest("departure date required".into()))?;

        tracing::info!(origin, destination, %date, "searching amadeus flights");
        let query = [
            ("originLocationCode", origin.to_string()),
            ("destinationLocationCode", destination.to_string()),
            ("departureDate", date.to_string()),
            ("adults", "1".to_string()),
            ("max", MAX_FLIGHT_RESULTS.to_string()),
        ];
        let response: FlightOffersResponse = self.get_json("/v2/shopping/flight-offers", &query).await?;

        let flights: Vec<OptionRecord> = response
            .data
            .into_iter()
            .filter_map(normalize_flight_offer)
            .collect();
        if flights.is_empty() {
            return Err(ProviderError::NoResults(format!("no flights {} to {}", origin, destination)));
        }
        Ok(flights)
    }

    async fn search_hotels(
        &self,
        city: &str,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<Vec<OptionRecord>, ProviderError> {
        tracing::info!(city, "searching amadeus hotels");
        let listing: HotelListResponse = self
            .get_json(
                "/v1/reference-data/locations/hotels/by-city",
                &[("cityCode", city.to_string())],
            )
            .await?;
        if listing.data.is_empty() {
            return Err(ProviderError::NoResults(format!("no hotels in {}", city)));
        }

        let mut hotels = Vec::new();
        for hotel in listing.data.iter().take(MAX_HOTELS_PRICED) {
            match self.price_hotel(&hotel.hotel_id, check_in, check_out).await {
                Ok(Some(record)) => hotels.push(record),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(hotel_id = %hotel.hotel_id, error = %err, "skipping hotel without offer");
                }
            }
        }

        if hotels.is_empty() {
            return Err(ProviderError::NoResults("no available hotel offers".into()));
        }
        Ok(hotels)
    }

    async fn search_activities(&self, city: &str) -> Result<Vec<OptionRecord>, ProviderError> {
        let (latitude, longitude) = city_coordinates(city);
        tracing::info!(city, "searching amadeus activities");
        let response: ActivitiesResponse = self
            .get_json(
                "/v1/shopping/activities",
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                ],
            )
            .await?;

        Ok(response
            .data
            .into_iter()
            .take(MAX_ACTIVITIES)
            .filter_map(normalize_activity)
            .collect())
    }

    fn name(&self) -> &'static str {
        "amadeus"
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        400 => ProviderError::InvalidRequest(body),
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Unavailable(format!("status {}: {}", status, body)),
    })
}

/// Converts EUR to INR rounded to paise; other currencies pass through.
pub fn to_inr(amount: f64, currency: &str) -> (f64, String) {
    if currency.eq_ignore_ascii_case("EUR") {
        ((amount * EUR_TO_INR * 100.0).round() / 100.0, "INR".to_string())
    } else {
        (amount, currency.to_string())
    }
}

/// Formats an ISO-8601 duration such as `PT2H35M` as `2h 35m`.
pub fn format_duration(iso: &str) -> String {
    let Some((_, time)) = iso.split_once('T') else {
        return "N/A".to_string();
    };
    let mut hours = 0u32;
    let mut minutes = 0u32;
    let mut digits = String::new();
    for c in time.chars() {
        match c {
            '0'..='9' => digits.push(c),
            'H' => hours = std::mem::take(&mut digits).parse().unwrap_or(0),
            'M' => minutes = std::mem::take(&mut digits).parse().unwrap_or(0),
            _ => digits.clear(),
        }
    }
    format!("{}h {}m", hours, minutes)
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn normalize_flight_offer(offer: FlightOffer) -> Option<OptionRecord> {
    let itinerary = offer.itineraries.first()?;
    let first = itinerary.segments.first()?;
    let last = itinerary.segments.last()?;
    let (price, currency) = to_inr(parse_amount(&offer.price.total)?, &offer.price.currency);
    let cabin = offer
        .traveler_pricings
        .first()
        .and_then(|p| p.fare_details_by_segment.first())
        .and_then(|f| f.cabin.clone())
        .unwrap_or_else(|| "ECONOMY".to_string());

    OptionRecord::new(json!({
        "id": offer.id,
        "price": price,
        "currency": currency,
        "departure_time": first.departure.at,
        "arrival_time": last.arrival.at,
        "duration": itinerary.duration.as_deref().map(format_duration).unwrap_or_else(|| "N/A".into()),
        "stops": itinerary.segments.len() - 1,
        "airline": first.carrier_code.clone().unwrap_or_else(|| "Unknown".into()),
        "departure_airport": first.departure.iata_code,
        "arrival_airport": last.arrival.iata_code,
        "aircraft": first.aircraft.as_ref().map(|a| a.code.clone()).unwrap_or_else(|| "N/A".into()),
        "cabin": cabin,
    }))
    .ok()
}

fn normalize_hotel_offer(hotel_id: &str, set: HotelOfferSet) -> Option<OptionRecord> {
    let offer = set.offers.into_iter().next()?;
    let (price, currency) = to_inr(parse_amount(&offer.price.total)?, &offer.price.currency);
    let room_type = offer
        .room
        .and_then(|r| r.type_estimated)
        .and_then(|t| t.category)
        .unwrap_or_else(|| "Standard".to_string());
    let amenities: Vec<String> = set.hotel.amenities.into_iter().take(MAX_AMENITIES).collect();

    OptionRecord::new(json!({
        "id": hotel_id,
        "name": set.hotel.name,
        "price_per_night": price,
        "currency": currency,
        "rating": set.hotel.rating.unwrap_or_else(|| json!("N/A")),
        "amenities": amenities,
        "room_type": room_type,
    }))
    .ok()
}

fn normalize_activity(activity: Activity) -> Option<OptionRecord> {
    let (price, currency) = match activity.price {
        Some(p) => (
            p.amount.as_deref().and_then(parse_amount).unwrap_or(0.0),
            p.currency_code.unwrap_or_else(|| "INR".into()),
        ),
        None => (0.0, "INR".to_string()),
    };
    OptionRecord::new(json!({
        "id": activity.id,
        "name": activity.name,
        "description": activity.short_description.unwrap_or_default(),
        "price": price,
        "currency": currency,
    }))
    .ok()
}

/// Latitude and longitude for the supported cities; centre of India otherwise.
fn city_coordinates(code: &str) -> (f64, f64) {
    match City::by_code(code).map(|c| c.code) {
        Some("BOM") => (19.0760, 72.8777),
        Some("DEL") => (28.6139, 77.2090),
        Some("BLR") => (12.9716, 77.5946),
        Some("GOI") => (15.2993, 74.1240),
        Some("MAA") => (13.0827, 80.2707),
        Some("CCU") => (22.5726, 88.3639),
        Some("HYD") => (17.3850, 78.4867),
        Some("PNQ") => (18.5204, 73.8567),
        Some("JAI") => (26.9124, 75.7873),
        Some("COK") => (9.9312, 76.2673),
        _ => (20.5937, 78.9629),
    }
}

// ----- Amadeus API Types -----

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightOffer {
    id: String,
    itineraries: Vec<Itinerary>,
    price: Price,
    #[serde(default)]
    traveler_pricings: Vec<TravelerPricing>,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    duration: Option<String>,
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    departure: SegmentEndpoint,
    arrival: SegmentEndpoint,
    carrier_code: Option<String>,
    aircraft: Option<Aircraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentEndpoint {
    iata_code: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct Aircraft {
    code: String,
}

#[derive(Debug, Deserialize)]
struct Price {
    total: String,
    currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TravelerPricing {
    #[serde(default)]
    fare_details_by_segment: Vec<FareDetail>,
}

#[derive(Debug, Deserialize)]
struct FareDetail {
    cabin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HotelListResponse {
    #[serde(default)]
    data: Vec<HotelRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelRef {
    hotel_id: String,
}

#[derive(Debug, Deserialize)]
struct HotelOffersResponse {
    #[serde(default)]
    data: Vec<HotelOfferSet>,
}

#[derive(Debug, Deserialize)]
struct HotelOfferSet {
    hotel: HotelInfo,
    #[serde(default)]
    offers: Vec<HotelOffer>,
}

#[derive(Debug, Deserialize)]
struct HotelInfo {
    name: String,
    rating: Option<serde_json::Value>,
    #[serde(default)]
    amenities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HotelOffer {
    price: Price,
    room: Option<Room>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Room {
    type_estimated: Option<TypeEstimated>,
}

#[derive(Debug, Deserialize)]
struct TypeEstimated {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActivitiesResponse {
    #[serde(default)]
    data: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Activity {
    id: String,
    name: String,
    short_description: Option<String>,
    price: Option<ActivityPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityPrice {
    amount: Option<String>,
    currency_code: Option<String>,
}
