//! Read-only trip snapshot used by itinerary synthesis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Persona;

/// Trip days assumed when the dates cannot be used.
pub const DEFAULT_TRIP_DAYS: i64 = 3;

/// Longest itinerary one synthesis request can describe.
pub const MAX_ITINERARY_DAYS: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripContext {
    pub departure_city: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<u64>,
    pub persona: Persona,
}

impl TripContext {
    /// Whole days between start and end, at least 1.
    pub fn trip_days(&self) -> usize {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (end - start).num_days().max(1) as usize,
            _ => DEFAULT_TRIP_DAYS as usize,
        }
    }

    /// Number of itinerary days to draft: the trip length, capped at
    /// [`MAX_ITINERARY_DAYS`].
    pub fn day_count(&self) -> usize {
        self.trip_days().min(MAX_ITINERARY_DAYS)
    }

    pub fn itinerary_is_truncated(&self) -> bool {
        self.trip_days() > MAX_ITINERARY_DAYS
    }
}
