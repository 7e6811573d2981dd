//! Dialogue state machine.
//!
//! All stage movement goes through [`transition`], a pure function of the
//! current stage, the event and the collected facts. The turn and selection
//! helpers below combine it with extraction and canned replies; they never
//! touch storage or the network.

use super::extractor::{extract, ExtractedFacts};
use super::intent::{detect_intent, prerequisites_met};
use super::replies;
use crate::domain::trip::{CollectedInfo, OptionRecord, OptionsCategory, Stage};

/// Something that happened in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueEvent {
    /// Facts were (possibly) extracted from a free-text message.
    FactsUpdated,
    /// The user explicitly asked to see options.
    OptionsRequested(OptionsCategory),
    FlightSelected,
    HotelSelected,
    ActivitySelected,
    Finalized,
}

/// Result of a transition: the new stage and, optionally, which options
/// should be fetched and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub stage: Stage,
    pub signal: Option<OptionsCategory>,
}

impl Transition {
    fn stay(stage: Stage) -> Self {
        Self { stage, signal: None }
    }
}

/// The single stage transition function.
///
/// Never returns a stage earlier than `stage`.
pub fn transition(stage: Stage, event: DialogueEvent, info: &CollectedInfo) -> Transition {
    match event {
        DialogueEvent::FactsUpdated => advance_collection(stage, info),
        DialogueEvent::OptionsRequested(category) => {
            if prerequisites_met(category, info) {
                Transition {
                    stage: stage.max(category.stage()),
                    signal: Some(category),
                }
            } else {
                Transition::stay(stage)
            }
        }
        DialogueEvent::FlightSelected => Transition {
            stage: stage.max(Stage::Hotels),
            signal: Some(OptionsCategory::Hotels),
        },
        DialogueEvent::HotelSelected => Transition {
            stage: stage.max(Stage::Activities),
            signal: Some(OptionsCategory::Activities),
        },
        DialogueEvent::ActivitySelected => Transition::stay(stage.max(Stage::Activities)),
        DialogueEvent::Finalized => Transition::stay(Stage::Complete),
    }
}

/// One step forward when the fact that closes the current stage is known,
/// then the automatic jump from `budget_set` to flight options.
fn advance_collection(stage: Stage, info: &CollectedInfo) -> Transition {
    let next = match stage {
        Stage::Greeting if info.departure_city.is_some() => Stage::Departure,
        Stage::Departure if info.destination.is_some() => Stage::Destination,
        Stage::Destination | Stage::DestinationSet if info.start_date.is_some() => {
            Stage::StartDateSet
        }
        Stage::StartDateSet if info.end_date.is_some() => Stage::EndDateSet,
        Stage::EndDateSet if info.budget.is_some() => Stage::BudgetSet,
        other => other,
    };

    if next == Stage::BudgetSet && info.budget.is_some() {
        return Transition {
            stage: Stage::Flights,
            signal: Some(OptionsCategory::Flights),
        };
    }
    Transition::stay(next)
}

/// How a free-text message is handled.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnPlan {
    /// The message asked for options. The reply is canned and no facts are
    /// extracted.
    OptionsRequest {
        category: OptionsCategory,
        accepted: bool,
        transition: Transition,
        message: String,
    },
    /// Facts were extracted; a reply still has to be generated for the new
    /// stage.
    Collect {
        info: CollectedInfo,
        facts: ExtractedFacts,
        transition: Transition,
    },
}

/// Decides how to handle `utterance` given the session's stage and facts.
pub fn plan_turn(stage: Stage, info: &CollectedInfo, utterance: &str) -> TurnPlan {
    if let Some(category) = detect_intent(utterance) {
        let accepted = prerequisites_met(category, info);
        let message = if accepted {
            replies::options_requested(category, info)
        } else {
            replies::missing_prerequisites(category).to_string()
        };
        return TurnPlan::OptionsRequest {
            category,
            accepted,
            transition: transition(stage, DialogueEvent::OptionsRequested(category), info),
            message,
        };
    }

    let mut updated = info.clone();
    let facts = extract(utterance, &mut updated, stage);
    let transition = transition(stage, DialogueEvent::FactsUpdated, &updated);
    TurnPlan::Collect {
        info: updated,
        facts,
        transition,
    }
}

/// Outcome of an explicit selection or finalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    pub info: CollectedInfo,
    pub transition: Transition,
    pub message: String,
}

pub fn select_flight(stage: Stage, info: &CollectedInfo, flight: OptionRecord) -> SelectionOutcome {
    let message = replies::flight_selected(&flight);
    let mut info = info.clone();
    info.selected_flight = Some(flight);
    SelectionOutcome {
        transition: transition(stage, DialogueEvent::FlightSelected, &info),
        info,
        message,
    }
}

pub fn select_hotel(stage: Stage, info: &CollectedInfo, hotel: OptionRecord) -> SelectionOutcome {
    let message = replies::hotel_selected(&hotel);
    let mut info = info.clone();
    info.selected_hotel = Some(hotel);
    SelectionOutcome {
        transition: transition(stage, DialogueEvent::HotelSelected, &info),
        info,
        message,
    }
}

pub fn select_activity(stage: Stage, info: &CollectedInfo, activity: OptionRecord) -> SelectionOutcome {
    let message = replies::activity_selected(&activity);
    let mut info = info.clone();
    info.add_activity(activity);
    SelectionOutcome {
        transition: transition(stage, DialogueEvent::ActivitySelected, &info),
        info,
        message,
    }
}

pub fn finalize(stage: Stage, info: &CollectedInfo) -> SelectionOutcome {
    SelectionOutcome {
        transition: transition(stage, DialogueEvent::Finalized, info),
        info: info.clone(),
        message: replies::FINALIZING.to_string(),
    }
}
