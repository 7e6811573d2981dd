//! Travel data provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::ai::is_http_url;
use super::error::ValidationError;

/// Credentials and endpoints for the live travel providers.
///
/// Missing credentials are not an error: the affected searches are served
/// from the embedded fallback dataset instead.
#[derive(Debug, Deserialize)]
pub struct TravelConfig {
    /// Amadeus self-service API key
    pub amadeus_api_key: Option<Secret<String>>,

    /// Amadeus self-service API secret
    pub amadeus_api_secret: Option<Secret<String>>,

    /// Amadeus base URL (test or production environment)
    #[serde(default = "default_amadeus_base_url")]
    pub amadeus_base_url: String,

    /// Google Places API key
    pub google_places_api_key: Option<Secret<String>>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn present(value: &Option<Secret<String>>) -> bool {
    value
        .as_ref()
        .is_some_and(|v| !v.expose_secret().is_empty())
}

impl TravelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Both Amadeus credentials are present
    pub fn has_amadeus(&self) -> bool {
        present(&self.amadeus_api_key) && present(&self.amadeus_api_secret)
    }

    pub fn has_google_places(&self) -> bool {
        present(&self.google_places_api_key)
    }

    /// Validate travel configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if present(&self.amadeus_api_key) != present(&self.amadeus_api_secret) {
            return Err(ValidationError::IncompleteAmadeusCredentials);
        }
        if !is_http_url(&self.amadeus_base_url) {
            return Err(ValidationError::InvalidUrl("TRAVEL__AMADEUS_BASE_URL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            amadeus_api_key: None,
            amadeus_api_secret: None,
            amadeus_base_url: default_amadeus_base_url(),
            google_places_api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_amadeus_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
