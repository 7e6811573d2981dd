//! Provider option records and the categories they are offered in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::Stage;
use crate::domain::foundation::ValidationError;

/// One flight, hotel or activity as returned by a provider.
///
/// The record is opaque to the dialogue: only a handful of well-known fields
/// (`id`, `name`, `airline`, `price`, ...) are ever read. Equality is full
/// structural equality of the underlying JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct OptionRecord(Value);

impl OptionRecord {
    /// Wraps a JSON object. Non-object values are rejected.
    pub fn new(value: Value) -> Result<Self, ValidationError> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(ValidationError::invalid_format(
                "option",
                "provider option must be a JSON object",
            ))
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns a string field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns a numeric field, accepting numeric strings.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.0.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        }
    }

    pub fn price(&self) -> Option<f64> {
        self.number("price")
    }

    /// Returns the `id` field rendered as text, whether stored as string or number.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns `field` or the supplied fallback when absent.
    pub fn text_or<'a>(&'a self, field: &str, fallback: &'a str) -> &'a str {
        self.text(field).unwrap_or(fallback)
    }
}

impl TryFrom<Value> for OptionRecord {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionRecord> for Value {
    fn from(record: OptionRecord) -> Self {
        record.0
    }
}

/// The kinds of options a session can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsCategory {
    Flights,
    Hotels,
    Activities,
}

impl OptionsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Hotels => "hotels",
            Self::Activities => "activities",
        }
    }

    /// Maximum number of options offered at once.
    pub fn display_limit(&self) -> usize {
        match self {
            Self::Flights => 3,
            Self::Hotels => 5,
            Self::Activities => 8,
        }
    }

    /// The stage in which the user picks from this category.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Flights => Stage::Flights,
            Self::Hotels => Stage::Hotels,
            Self::Activities => Stage::Activities,
        }
    }
}

impl fmt::Display for OptionsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats an amount in rupees with thousands separators.
///
/// Whole amounts drop the fraction: `₹12,500`. Others keep two places.
pub fn format_rupees(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{}₹{}", sign, grouped)
    } else {
        format!("{}₹{}.{:02}", sign, grouped, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod option_record {
        use super::*;

        #[test]
        fn rejects_non_objects() {
            assert!(OptionRecord::new(json!("flight")).is_err());
            assert!(OptionRecord::new(json!([1, 2])).is_err());
            assert!(serde_json::from_value::<OptionRecord>(json!(42)).is_err());
        }

        #[test]
        fn reads_known_fields() {
            let rec = OptionRecord::new(json!({"id": 7, "airline": "6E", "price": "4,999"})).unwrap();
            assert_eq!(rec.id(), Some("7".to_string()));
            assert_eq!(rec.text("airline"), Some("6E"));
            assert_eq!(rec.price(), Some(4999.0));
            assert_eq!(rec.text_or("name", "flight"), "flight");
        }

        #[test]
        fn equality_is_structural() {
            let a = OptionRecord::new(json!({"name": "Fort", "price": 0})).unwrap();
            let b = OptionRecord::new(json!({"price": 0, "name": "Fort"})).unwrap();
            let c = OptionRecord::new(json!({"name": "Fort", "price": 1})).unwrap();
            assert_eq!(a, b);
            assert_ne!(a, c);
        }

        #[test]
        fn serializes_as_the_raw_object() {
            let rec = OptionRecord::new(json!({"name": "Taj"})).unwrap();
            assert_eq!(serde_json::to_value(&rec).unwrap(), json!({"name": "Taj"}));
        }
    }

    mod category {
        use super::*;

        #[test]
        fn display_limits() {
            assert_eq!(OptionsCategory::Flights.display_limit(), 3);
            assert_eq!(OptionsCategory::Hotels.display_limit(), 5);
            assert_eq!(OptionsCategory::Activities.display_limit(), 8);
        }

        #[test]
        fn maps_to_selection_stage() {
            assert_eq!(OptionsCategory::Hotels.stage(), Stage::Hotels);
        }

        #[test]
        fn serializes_snake_case() {
            assert_eq!(
                serde_json::to_string(&OptionsCategory::Activities).unwrap(),
                "\"activities\""
            );
        }
    }

    mod rupees {
        use super::*;

        #[test]
        fn groups_thousands() {
            assert_eq!(format_rupees(4999.0), "₹4,999");
            assert_eq!(format_rupees(1_234_567.0), "₹1,234,567");
            assert_eq!(format_rupees(0.0), "₹0");
        }

        #[test]
        fn keeps_paise_when_present() {
            assert_eq!(format_rupees(5361.5), "₹5,361.50");
        }

        #[test]
        fn formats_negative_amounts() {
            assert_eq!(format_rupees(-12000.0), "-₹12,000");
        }
    }
}
