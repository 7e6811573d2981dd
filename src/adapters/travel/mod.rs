//! Travel Provider Adapters.
//!
//! Implementations of the TravelProvider port.
//!
//! ## Available Adapters
//!
//! - `AmadeusProvider` - Flights, hotels and activities via Amadeus self-service APIs
//! - `GooglePlacesProvider` - Activities via Google Places text search
//! - `RoutedTravelProvider` - Sends flights/hotels and activities to different providers
//! - `FallbackTravelProvider` - Serves the embedded local dataset
//! - `OfflineTravelProvider` - Always `NotConfigured`; used without credentials
//! - `MockTravelProvider` - Configurable mock for testing

mod amadeus;
mod fallback_data;
mod google_places;
mod mock;
mod offline;
mod routed;

pub use amadeus::{format_duration, to_inr, AmadeusConfig, AmadeusProvider, EUR_TO_INR};
pub use fallback_data::{FallbackDataset, FallbackTravelProvider};
pub use google_places::{GooglePlacesConfig, GooglePlacesProvider};
pub use mock::MockTravelProvider;
pub use offline::OfflineTravelProvider;
pub use routed::RoutedTravelProvider;
