//! The facts collected over a planning conversation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{OptionRecord, Persona, TripContext};

/// Everything the dialogue has learned about the trip so far.
///
/// Fields start empty and are filled incrementally by fact extraction and
/// explicit selections. Nothing is ever cleared during a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedInfo {
    pub departure_city: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    pub selected_flight: Option<OptionRecord>,
    pub selected_hotel: Option<OptionRecord>,
    #[serde(default)]
    pub selected_activities: Vec<OptionRecord>,
}

impl CollectedInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the end date unless it would precede the start date.
    ///
    /// Returns true if the date was stored.
    pub fn try_set_end_date(&mut self, end: NaiveDate) -> bool {
        match self.start_date {
            Some(start) if end < start => false,
            _ => {
                self.end_date = Some(end);
                true
            }
        }
    }

    /// Appends an activity unless an identical record is already selected.
    ///
    /// Returns true if the activity was added.
    pub fn add_activity(&mut self, activity: OptionRecord) -> bool {
        if self.selected_activities.contains(&activity) {
            return false;
        }
        self.selected_activities.push(activity);
        true
    }

    /// A session is complete once a flight, a hotel and at least one activity
    /// have been chosen.
    pub fn is_complete(&self) -> bool {
        self.selected_flight.is_some()
            && self.selected_hotel.is_some()
            && !self.selected_activities.is_empty()
    }

    /// Read-only snapshot handed to itinerary synthesis.
    pub fn trip_context(&self) -> TripContext {
        TripContext {
            departure_city: self.departure_city.clone(),
            destination: self.destination.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            persona: self.persona.unwrap_or_default(),
        }
    }
}
