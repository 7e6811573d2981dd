//! Dialogue stages of a planning session.
//!
//! Stages are strictly ordered. A session only ever moves forward through
//! them; the declaration order below is that order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The current step of the guided information-collection dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing collected yet; asking where the traveller starts from.
    Greeting,
    /// Departure city known; asking for the destination.
    Departure,
    /// Destination known; asking for the start date.
    Destination,
    /// Reserved on the wire. The dialogue goes from `Destination` straight to
    /// `StartDateSet`.
    DestinationSet,
    StartDateSet,
    EndDateSet,
    BudgetSet,
    Flights,
    Hotels,
    Activities,
    Complete,
}

impl Stage {
    /// Every stage in dialogue order.
    pub const ALL: [Stage; 11] = [
        Stage::Greeting,
        Stage::Departure,
        Stage::Destination,
        Stage::DestinationSet,
        Stage::StartDateSet,
        Stage::EndDateSet,
        Stage::BudgetSet,
        Stage::Flights,
        Stage::Hotels,
        Stage::Activities,
        Stage::Complete,
    ];

    /// Wire name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Departure => "departure",
            Self::Destination => "destination",
            Self::DestinationSet => "destination_set",
            Self::StartDateSet => "start_date_set",
            Self::EndDateSet => "end_date_set",
            Self::BudgetSet => "budget_set",
            Self::Flights => "flights",
            Self::Hotels => "hotels",
            Self::Activities => "activities",
            Self::Complete => "complete",
        }
    }

    /// What the assistant should be doing while in this stage.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Greeting => "Say hi, ask where they're traveling FROM",
            Self::Departure => "Got departure, ask where they're going TO",
            Self::Destination | Self::DestinationSet => {
                "Got destination, ask WHEN they're leaving (start date)"
            }
            Self::StartDateSet => "Got start date, ask when they're RETURNING (end date)",
            Self::EndDateSet => "Got end date, ask their BUDGET",
            Self::BudgetSet => "Got budget, say \"Let me find flights...\" (don't ask anything)",
            Self::Flights => "User will select a flight",
            Self::Hotels => "User will select a hotel",
            Self::Activities => "User will select activities",
            Self::Complete => "All done!",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Greeting
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        target > self
    }

    fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL.iter().copied().filter(|s| s > self).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ordering {
        use super::*;

        #[test]
        fn all_is_sorted() {
            let mut sorted = Stage::ALL;
            sorted.sort();
            assert_eq!(sorted, Stage::ALL);
        }

        #[test]
        fn greeting_is_first_and_complete_is_last() {
            assert_eq!(Stage::ALL.first(), Some(&Stage::Greeting));
            assert_eq!(Stage::ALL.last(), Some(&Stage::Complete));
        }

        #[test]
        fn max_never_regresses() {
            assert_eq!(Stage::Activities.max(Stage::Hotels), Stage::Activities);
            assert_eq!(Stage::Greeting.max(Stage::Hotels), Stage::Hotels);
        }
    }

    mod state_machine {
        use super::*;

        #[test]
        fn only_forward_transitions_are_valid() {
            assert!(Stage::Greeting.can_transition_to(&Stage::Departure));
            assert!(Stage::BudgetSet.can_transition_to(&Stage::Flights));
            assert!(!Stage::Hotels.can_transition_to(&Stage::Flights));
            assert!(!Stage::Hotels.can_transition_to(&Stage::Hotels));
        }

        #[test]
        fn complete_is_terminal() {
            assert!(Stage::Complete.is_terminal());
            assert!(!Stage::Activities.is_terminal());
        }

        #[test]
        fn backward_transition_errors() {
            assert!(Stage::Complete.transition_to(Stage::Greeting).is_err());
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn uses_wire_names() {
            for stage in Stage::ALL {
                let json = serde_json::to_string(&stage).unwrap();
                assert_eq!(json, format!("\"{}\"", stage.as_str()));
            }
        }

        #[test]
        fn parses_wire_name() {
            let stage: Stage = serde_json::from_str("\"start_date_set\"").unwrap();
            assert_eq!(stage, Stage::StartDateSet);
        }

        #[test]
        fn every_stage_has_a_directive() {
            for stage in Stage::ALL {
                assert!(!stage.directive().is_empty());
            }
        }
    }
}
