//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Longest client-supplied session identifier accepted.
const MAX_SESSION_ID_LEN: usize = 128;

/// Identifier of one planning conversation.
///
/// Clients choose their own session ids (any non-empty token), so unlike a
/// plain UUID newtype this wraps a validated string. Server-issued ids are
/// random v4 UUIDs rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        if trimmed.len() > MAX_SESSION_ID_LEN {
            return Err(ValidationError::invalid_format(
                "session_id",
                format!("must be at most {} characters", MAX_SESSION_ID_LEN),
            ));
        }
        if trimmed.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(ValidationError::invalid_format(
                "session_id",
                "must not contain whitespace or control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn new_session_id_is_a_uuid() {
        let id = SessionId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn parses_client_supplied_token() {
        let id: SessionId = "demo-session-1".parse().unwrap();
        assert_eq!(id.as_str(), "demo-session-1");
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let id: SessionId = "  abc  ".parse().unwrap();
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn rejects_empty() {
        assert!("".parse::<SessionId>().is_err());
        assert!("   ".parse::<SessionId>().is_err());
    }

    #[test]
    fn rejects_inner_whitespace() {
        assert!("a b".parse::<SessionId>().is_err());
    }

    #[test]
    fn rejects_overlong() {
        let long = "x".repeat(MAX_SESSION_ID_LEN + 1);
        assert!(long.parse::<SessionId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: SessionId = "s1".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s1\"");
        let back: SessionId = serde_json::from_str("\"s1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_empty_string() {
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());
    }
}
