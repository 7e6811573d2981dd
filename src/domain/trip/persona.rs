//! Travel personas that weight the itinerary negotiation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A travel-priority profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Budget,
    Luxury,
    Experience,
    Cultural,
    Balanced,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Budget,
        Persona::Luxury,
        Persona::Experience,
        Persona::Cultural,
        Persona::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Luxury => "luxury",
            Self::Experience => "experience",
            Self::Cultural => "cultural",
            Self::Balanced => "balanced",
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::Balanced
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "persona",
                    format!("unknown persona '{}'", s.trim()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_balanced() {
        assert_eq!(Persona::default(), Persona::Balanced);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Luxury".parse::<Persona>(), Ok(Persona::Luxury));
        assert_eq!(" cultural ".parse::<Persona>(), Ok(Persona::Cultural));
    }

    #[test]
    fn rejects_unknown() {
        assert!("backpacker".parse::<Persona>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Persona::Experience).unwrap(), "\"experience\"");
    }
}
