//! Explicit option requests ("show me hotels").

use crate::domain::trip::{CollectedInfo, OptionsCategory};

/// Keywords per category, checked in this order.
pub const INTENT_LEXICONS: [(OptionsCategory, &[&str]); 3] = [
    (
        OptionsCategory::Flights,
        &["flight", "flights", "fly", "cheapest flight", "show me flights"],
    ),
    (
        OptionsCategory::Hotels,
        &["hotel", "hotels", "stay", "accommodation", "show me hotels"],
    ),
    (
        OptionsCategory::Activities,
        &["activity", "activities", "things to do", "visit", "attractions"],
    ),
];

/// Returns the first category whose lexicon has a keyword in `utterance`.
///
/// Keywords match on word boundaries, so "butterfly" is not a flight request.
pub fn detect_intent(utterance: &str) -> Option<OptionsCategory> {
    let lower = utterance.to_lowercase();
    INTENT_LEXICONS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&lower, k)))
        .map(|(category, _)| *category)
}

/// Whether enough is known to fetch options of `category`.
pub fn prerequisites_met(category: OptionsCategory, info: &CollectedInfo) -> bool {
    match category {
        OptionsCategory::Flights => info.departure_city.is_some() && info.destination.is_some(),
        OptionsCategory::Hotels | OptionsCategory::Activities => info.destination.is_some(),
    }
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
