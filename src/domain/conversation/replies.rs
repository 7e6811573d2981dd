//! Canned assistant replies.

use crate::domain::trip::{format_rupees, CollectedInfo, OptionRecord, OptionsCategory, Stage};

/// Reply used when text generation is unavailable, keyed by the stage the
/// session has just moved into.
pub fn fallback_reply(stage: Stage) -> &'static str {
    match stage {
        Stage::Greeting => "Hi! Where are you traveling from?",
        Stage::Departure => "Great! And where would you like to go?",
        Stage::Destination | Stage::DestinationSet => "Perfect! When are you planning to leave?",
        Stage::StartDateSet => "Got it! When will you be returning?",
        Stage::EndDateSet => "Awesome! What's your budget for this trip?",
        Stage::BudgetSet | Stage::Flights => "Let me find the best flights for your trip...",
        _ => "Let me help you plan this trip!",
    }
}

/// Redirect sent when an option request lacks the facts it needs.
pub fn missing_prerequisites(category: OptionsCategory) -> &'static str {
    match category {
        OptionsCategory::Flights => {
            "I'll need to know where you're traveling from and to first! Where are you departing from?"
        }
        OptionsCategory::Hotels => {
            "Where would you like to stay? I need to know your destination first!"
        }
        OptionsCategory::Activities => {
            "I'd love to show you activities! But where are you planning to visit?"
        }
    }
}

/// Acknowledgment sent when an option request is accepted.
pub fn options_requested(category: OptionsCategory, info: &CollectedInfo) -> String {
    let from = info.departure_city.as_deref().unwrap_or_default();
    let to = info.destination.as_deref().unwrap_or_default();
    match category {
        OptionsCategory::Flights => {
            format!("Perfect! Let me search for the best flights from {} to {}...", from, to)
        }
        OptionsCategory::Hotels => format!("Great! Let me find the best hotels in {}...", to),
        OptionsCategory::Activities => {
            format!("Awesome! Here are some amazing things to do in {}...", to)
        }
    }
}

pub fn flight_selected(flight: &OptionRecord) -> String {
    format!(
        "Perfect choice! The {} at {} is selected. Now let me show you some great hotels...",
        flight.text_or("airline", "flight"),
        format_rupees(flight.price().unwrap_or(0.0))
    )
}

pub fn hotel_selected(hotel: &OptionRecord) -> String {
    format!(
        "Excellent! {} is a great choice. Now, here are some amazing activities you can do...",
        hotel.text_or("name", "This hotel")
    )
}

pub fn activity_selected(activity: &OptionRecord) -> String {
    format!(
        "Added {} to your itinerary! Feel free to select more activities or say 'done' when ready.",
        activity.text_or("name", "activity")
    )
}

pub const FINALIZING: &str =
    "Perfect! Let me have my AI agents review your selections and create the perfect itinerary for you...";

/// Sent when a turn could not be recorded.
pub const TURN_FAILED: &str =
    "Sorry, I couldn't save that just now. Could you tell me again?";

/// Caption for a batch of options shown to the user.
pub fn options_caption(category: OptionsCategory, count: usize, info: &CollectedInfo) -> String {
    let from = info.departure_city.as_deref().unwrap_or_default();
    let to = info.destination.as_deref().unwrap_or_default();
    match category {
        OptionsCategory::Flights => {
            format!("Here are the best {} flights from {} to {}:", count, from, to)
        }
        OptionsCategory::Hotels => format!("Here are {} great hotels in {}:", count, to),
        OptionsCategory::Activities => {
            format!("Here are {} amazing things to do in {}:", count, to)
        }
    }
}
