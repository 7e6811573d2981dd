//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn orders_chronologically() {
        let earlier: Timestamp = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().into();
        assert!(earlier < Timestamp::now());
    }

    #[test]
    fn serializes_transparently() {
        let ts: Timestamp = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap().into();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-03-15T09:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
