//! The simulated negotiation between the three recommendation agents.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The three negotiating perspectives, in speaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    /// Argues for cost savings.
    Budget,
    /// Argues for comfort and quality.
    Luxury,
    /// Argues for memorable activities.
    Experience,
}

impl AgentRole {
    /// Speaking order within one round.
    pub const ROUND: [AgentRole; 3] = [AgentRole::Budget, AgentRole::Luxury, AgentRole::Experience];

    pub const ROUNDS: usize = 2;

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Budget => "Budget Agent",
            Self::Luxury => "Luxury Agent",
            Self::Experience => "Experience Agent",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Self::Budget => "cost savings focus",
            Self::Luxury => "comfort & quality focus",
            Self::Experience => "memorable activities focus",
        }
    }

    /// Recognises an agent from a free-form name such as "💰 Budget Agent".
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.contains("budget") || lower.contains("cost") {
            Some(Self::Budget)
        } else if lower.contains("luxury") || lower.contains("comfort") {
            Some(Self::Luxury)
        } else if lower.contains("experience") {
            Some(Self::Experience)
        } else {
            None
        }
    }

    /// Expected speaker for each transcript position.
    pub fn expected_order() -> impl Iterator<Item = AgentRole> {
        (0..Self::ROUNDS).flat_map(|_| Self::ROUND)
    }
}

/// One agent's contribution to a debate round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "agent", alias = "agent_name")]
    pub agent_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub preferred_flight: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub preferred_hotel: String,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub preferred_activities: Vec<String>,
    #[serde(rename = "argument", alias = "argument_text")]
    pub argument_text: String,
    #[serde(
        rename = "counterarguments",
        alias = "counterargument_text",
        alias = "counterargument",
        default,
        deserialize_with = "lenient_text"
    )]
    pub counterargument_text: String,
}

impl Argument {
    pub fn role(&self) -> Option<AgentRole> {
        AgentRole::from_name(&self.agent_name)
    }
}

/// Models sometimes answer with an object or number where a label is
/// expected; keep the most descriptive text available.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => ["name", "id", "airline"]
            .iter()
            .find_map(|k| map.get(*k).map(value_to_text))
            .unwrap_or_else(|| value.to_string()),
        Value::Array(items) => items.iter().map(value_to_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(value_to_text).collect(),
        other => vec![value_to_text(&other)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod roles {
        use super::*;

        #[test]
        fn recognises_decorated_names() {
            assert_eq!(AgentRole::from_name("💰 Budget Agent"), Some(AgentRole::Budget));
            assert_eq!(AgentRole::from_name("Comfort advocate"), Some(AgentRole::Luxury));
            assert_eq!(AgentRole::from_name("experience agent"), Some(AgentRole::Experience));
            assert_eq!(AgentRole::from_name("Moderator"), None);
        }

        #[test]
        fn expected_order_repeats_the_round() {
            let order: Vec<_> = AgentRole::expected_order().collect();
            assert_eq!(order.len(), 6);
            assert_eq!(&order[..3], &AgentRole::ROUND);
            assert_eq!(&order[3..], &AgentRole::ROUND);
        }
    }

    mod wire_format {
        use super::*;

        #[test]
        fn uses_short_wire_names() {
            let arg = Argument {
                agent_name: "Budget Agent".into(),
                preferred_flight: "F1".into(),
                preferred_hotel: "H1".into(),
                preferred_activities: vec!["Beach".into()],
                argument_text: "Cheapest works.".into(),
                counterargument_text: String::new(),
            };
            let value = serde_json::to_value(&arg).unwrap();
            assert_eq!(value["agent"], "Budget Agent");
            assert_eq!(value["argument"], "Cheapest works.");
            assert_eq!(value["counterarguments"], "");
        }

        #[test]
        fn tolerates_structured_preferences() {
            let arg: Argument = serde_json::from_value(json!({
                "agent": "Luxury Agent",
                "preferred_flight": {"id": "F2", "price": 9000},
                "preferred_hotel": 17,
                "preferred_activities": [{"name": "Spa"}, "Cruise"],
                "argument": "Comfort matters."
            }))
            .unwrap();
            assert_eq!(arg.preferred_flight, "F2");
            assert_eq!(arg.preferred_hotel, "17");
            assert_eq!(arg.preferred_activities, vec!["Spa", "Cruise"]);
            assert_eq!(arg.counterargument_text, "");
            assert_eq!(arg.role(), Some(AgentRole::Luxury));
        }

        #[test]
        fn requires_agent_and_argument() {
            assert!(serde_json::from_value::<Argument>(json!({"agent": "Budget Agent"})).is_err());
        }
    }
}
