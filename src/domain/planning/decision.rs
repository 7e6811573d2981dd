//! The reconciled itinerary decision.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::trip::OptionRecord;

/// Part of the day a schedule slot covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    /// Slots of a day, in order.
    pub const DAY: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    /// Conventional start time of the slot.
    pub fn default_time(&self) -> &'static str {
        match self {
            Self::Morning => "9:00 AM",
            Self::Afternoon => "1:00 PM",
            Self::Evening => "6:00 PM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub time: String,
    pub activity_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tips: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: f64,
    #[serde(default)]
    pub opening_hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub theme: String,
    pub schedule: Vec<ScheduleSlot>,
}

/// Flight, hotel and day-wise plan agreed by the agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub flight: Option<OptionRecord>,
    pub hotel: Option<OptionRecord>,
    pub itinerary: Vec<DayPlan>,
    pub activities: Vec<OptionRecord>,
    pub reasoning: String,
    pub key_tradeoffs: String,
}

/// Ratings arrive as numbers, numeric strings or "N/A".
fn lenient_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
