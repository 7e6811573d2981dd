//! Recommendation synthesis.
//!
//! One generative request simulates the two-round negotiation between the
//! budget, luxury and experience agents and drafts a day-wise itinerary. This
//! module owns everything around that request except the call itself: the
//! prompt, fence stripping, the single truncation repair, shape validation,
//! normalization against the candidate options and the safe fallback.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::debate::{AgentRole, Argument};
use super::decision::{DayPlan, FinalDecision, TimeSlot};
use crate::domain::trip::{CollectedInfo, OptionRecord, TripContext};

pub const SYNTHESIS_TEMPERATURE: f32 = 0.7;
pub const SYNTHESIS_MAX_TOKENS: u32 = 4000;

const FALLBACK_ARGUMENT: &str = "Selected the most cost-effective options for your trip.";
const FALLBACK_REASONING: &str = "Best options selected based on your preferences.";
const FALLBACK_TRADEOFFS: &str = "Balanced cost and experience.";

/// Candidates the agents choose between.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableOptions {
    pub flights: Vec<OptionRecord>,
    pub hotels: Vec<OptionRecord>,
    pub activities: Vec<OptionRecord>,
}

impl AvailableOptions {
    /// The user's own selections as the candidate set.
    pub fn from_selections(info: &CollectedInfo) -> Self {
        Self {
            flights: info.selected_flight.iter().cloned().collect(),
            hotels: info.selected_hotel.iter().cloned().collect(),
            activities: info.selected_activities.clone(),
        }
    }
}

/// Negotiation transcript plus the reconciled decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub debate_transcript: Vec<Argument>,
    pub final_decision: FinalDecision,
    /// Set when the result is the safe fallback rather than generated output.
    #[serde(skip)]
    pub is_fallback: bool,
}

/// Why generated output was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("synthesis output is not valid JSON: {0}")]
    Malformed(String),

    #[error("debate transcript has the wrong shape: {0}")]
    TranscriptShape(String),

    #[error("itinerary has the wrong shape: {0}")]
    ItineraryShape(String),
}

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    debate_transcript: Vec<Argument>,
    final_decision: RawDecision,
}

/// Flight, hotel and activities in the output are ignored; they are always
/// taken from the candidates.
#[derive(Debug, Deserialize)]
struct RawDecision {
    #[serde(default)]
    itinerary: Vec<DayPlan>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    key_tradeoffs: String,
}

/// Builds the single synthesis request.
pub fn synthesis_prompt(ctx: &TripContext, options: &AvailableOptions) -> String {
    let days = ctx.day_count();
    let context_json = serde_json::to_string_pretty(ctx).unwrap_or_else(|_| "{}".to_string());
    let options_json = serde_json::to_string_pretty(options).unwrap_or_else(|_| "{}".to_string());
    let start = ctx.start_date.map(|d| d.to_string()).unwrap_or_default();
    let agents = AgentRole::ROUND
        .iter()
        .map(|r| format!("  - {} ({})", r.display_name(), r.focus()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are the coordinator of a travel planning debate between three AI agents.

Trip Context:
{context_json}

Available Options:
{options_json}

Number of days: {days}

STEP 1 - Simulate a 2-round debate between:
{agents}
Each agent speaks ONE sentence per round (6 total entries in debate_transcript), in the order listed, both rounds.

STEP 2 - Create a {days}-day itinerary using the activities from available_options.activities.
Each day must have exactly 3 schedule slots: morning (9:00 AM), afternoon (1:00 PM), evening (6:00 PM).
Each slot needs: time_slot, time, activity_name, location, duration, tips, rating, opening_hours.

STEP 3 - Copy ALL activity objects from available_options.activities into final_decision.activities.

STEP 4 - Copy the FULL flight object and FULL hotel object into final_decision (not just IDs).

Return ONLY valid JSON, no markdown fences, no extra text, shaped like:

{{
  "debate_transcript": [
    {{
      "agent": "Budget Agent",
      "preferred_flight": "flight id or name",
      "preferred_hotel": "hotel id or name",
      "preferred_activities": ["activity names"],
      "argument": "One sentence argument.",
      "counterarguments": "Brief counter, empty in round 1."
    }}
  ],
  "final_decision": {{
    "flight": {{}},
    "hotel": {{}},
    "itinerary": [
      {{
        "day": 1,
        "date": "{start}",
        "theme": "Arrival & Exploration",
        "schedule": [
          {{
            "time_slot": "morning",
            "time": "9:00 AM",
            "activity_name": "Name from available activities",
            "location": "Full address or area",
            "duration": "2 hours",
            "tips": "Practical visitor tip",
            "rating": 4.5,
            "opening_hours": "9 AM - 6 PM"
          }}
        ]
      }}
    ],
    "activities": [],
    "reasoning": "2-3 sentence explanation of choices.",
    "key_tradeoffs": "What was balanced between agents."
  }}
}}

IMPORTANT: debate_transcript must have exactly 6 entries.
Create {days} day entries in itinerary (not just 1), each with morning, afternoon and evening slots.
"#
    )
}

/// Parses, validates and normalizes generated output.
pub fn parse_synthesis(
    raw: &str,
    ctx: &TripContext,
    options: &AvailableOptions,
) -> Result<SynthesisResult, SynthesisError> {
    let parsed = parse_with_repair(strip_code_fence(raw))?;
    let debate_transcript = validate_transcript(parsed.debate_transcript)?;
    let itinerary = normalize_itinerary(parsed.final_decision.itinerary, ctx)?;

    Ok(SynthesisResult {
        debate_transcript,
        final_decision: FinalDecision {
            flight: options.flights.first().cloned(),
            hotel: options.hotels.first().cloned(),
            itinerary,
            activities: options.activities.clone(),
            reasoning: non_empty_or(parsed.final_decision.reasoning, FALLBACK_REASONING),
            key_tradeoffs: non_empty_or(parsed.final_decision.key_tradeoffs, FALLBACK_TRADEOFFS),
        },
        is_fallback: false,
    })
}

/// Structurally valid, low-information result.
pub fn safe_fallback(options: &AvailableOptions) -> SynthesisResult {
    SynthesisResult {
        debate_transcript: vec![Argument {
            agent_name: AgentRole::Budget.display_name().to_string(),
            preferred_flight: String::new(),
            preferred_hotel: String::new(),
            preferred_activities: Vec::new(),
            argument_text: FALLBACK_ARGUMENT.to_string(),
            counterargument_text: String::new(),
        }],
        final_decision: FinalDecision {
            flight: options.flights.first().cloned(),
            hotel: options.hotels.first().cloned(),
            itinerary: Vec::new(),
            activities: options.activities.clone(),
            reasoning: FALLBACK_REASONING.to_string(),
            key_tradeoffs: FALLBACK_TRADEOFFS.to_string(),
        },
        is_fallback: true,
    }
}

/// Removes a surrounding ```json fence if present.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.strip_prefix("json").unwrap_or(body).trim()
}

/// Parses once, then retries once with everything after the last `}` cut off.
fn parse_with_repair(text: &str) -> Result<RawSynthesis, SynthesisError> {
    let first_error = match serde_json::from_str::<RawSynthesis>(text) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e,
    };

    let truncated = match text.rfind('}') {
        Some(last) if last + 1 < text.len() => &text[..=last],
        _ => return Err(SynthesisError::Malformed(first_error.to_string())),
    };
    tracing::debug!(error = %first_error, "retrying synthesis parse after truncation");
    serde_json::from_str(truncated).map_err(|e| SynthesisError::Malformed(e.to_string()))
}

fn validate_transcript(entries: Vec<Argument>) -> Result<Vec<Argument>, SynthesisError> {
    let expected: Vec<AgentRole> = AgentRole::expected_order().collect();
    if entries.len() != expected.len() {
        return Err(SynthesisError::TranscriptShape(format!(
            "expected {} entries, got {}",
            expected.len(),
            entries.len()
        )));
    }

    entries
        .into_iter()
        .zip(expected)
        .enumerate()
        .map(|(i, (mut entry, role))| {
            if entry.role() != Some(role) {
                return Err(SynthesisError::TranscriptShape(format!(
                    "entry {} should be {}, got '{}'",
                    i + 1,
                    role.display_name(),
                    entry.agent_name
                )));
            }
            entry.agent_name = role.display_name().to_string();
            Ok(entry)
        })
        .collect()
}

fn normalize_itinerary(days: Vec<DayPlan>, ctx: &TripContext) -> Result<Vec<DayPlan>, SynthesisError> {
    let expected_days = ctx.day_count();
    if days.len() != expected_days {
        return Err(SynthesisError::ItineraryShape(format!(
            "expected {} days, got {}",
            expected_days,
            days.len()
        )));
    }

    days.into_iter()
        .enumerate()
        .map(|(i, mut plan)| {
            let slots: Vec<TimeSlot> = plan.schedule.iter().map(|s| s.time_slot).collect();
            if slots != TimeSlot::DAY {
                return Err(SynthesisError::ItineraryShape(format!(
                    "day {} slots are {:?}",
                    i + 1,
                    slots
                )));
            }

            plan.day = (i + 1) as u32;
            if plan.date.trim().parse::<NaiveDate>().is_err() {
                plan.date = ctx
                    .start_date
                    .and_then(|start| start.checked_add_days(Days::new(i as u64)))
                    .map(|d| d.to_string())
                    .unwrap_or_default();
            }
            if plan.theme.trim().is_empty() {
                plan.theme = format!("Day {}", i + 1);
            }
            for slot in &mut plan.schedule {
                if slot.time.trim().is_empty() {
                    slot.time = slot.time_slot.default_time().to_string();
                }
            }
            Ok(plan)
        })
        .collect()
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::Persona;
    use serde_json::{json, Value};

    fn ctx(start: &str, end: &str) -> TripContext {
        TripContext {
            departure_city: Some("BLR".into()),
            destination: Some("GOI".into()),
            start_date: start.parse().ok(),
            end_date: end.parse().ok(),
            budget: Some(60000),
            persona: Persona::Balanced,
        }
    }

    fn options() -> AvailableOptions {
        let rec = |v: Value| OptionRecord::new(v).unwrap();
        AvailableOptions {
            flights: vec![rec(json!({"id": "F1", "airline": "6E", "price": 4599}))],
            hotels: vec![rec(json!({"id": "H1", "name": "Taj", "price_per_night": 8000}))],
            activities: vec![
                rec(json!({"name": "Baga Beach", "price": 0})),
                rec(json!({"name": "Fort Aguada", "price": 250})),
            ],
        }
    }

    fn argument(agent: &str) -> Value {
        json!({
            "agent": agent,
            "preferred_flight": "F1",
            "preferred_hotel": "H1",
            "preferred_activities": ["Baga Beach"],
            "argument": "One sentence.",
            "counterarguments": ""
        })
    }

    fn transcript() -> Vec<Value> {
        ["Budget Agent", "Luxury Agent", "Experience Agent"]
            .iter()
            .cycle()
            .take(6)
            .map(|a| argument(a))
            .collect()
    }

    fn day(n: u32, date: &str) -> Value {
        json!({
            "day": n,
            "date": date,
            "theme": "",
            "schedule": [
                {"time_slot": "morning", "time": "9:00 AM", "activity_name": "Baga Beach"},
                {"time_slot": "afternoon", "time": "", "activity_name": "Lunch"},
                {"time_slot": "evening", "time": "6:00 PM", "activity_name": "Fort Aguada"}
            ]
        })
    }

    fn output(days: Vec<Value>) -> Value {
        json!({
            "debate_transcript": transcript(),
            "final_decision": {
                "flight": {"id": "model-made-up"},
                "hotel": {},
                "itinerary": days,
                "activities": [],
                "reasoning": "Balanced picks.",
                "key_tradeoffs": "Cost versus comfort."
            }
        })
    }

    mod parsing {
        use super::*;

        #[test]
        fn accepts_well_formed_output() {
            let raw = output(vec![day(1, "2026-03-15"), day(2, "2026-03-16")]).to_string();
            let result = parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-17"), &options()).unwrap();
            assert!(!result.is_fallback);
            assert_eq!(result.debate_transcript.len(), 6);
            assert_eq!(result.final_decision.itinerary.len(), 2);
            assert_eq!(result.final_decision.reasoning, "Balanced picks.");
        }

        #[test]
        fn strips_code_fence() {
            let raw = format!("```json\n{}\n```", output(vec![day(1, "")]));
            assert!(parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-16"), &options()).is_ok());
        }

        #[test]
        fn repairs_trailing_garbage_once() {
            let raw = format!("{} Hope this helps!", output(vec![day(1, "")]));
            assert!(parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-16"), &options()).is_ok());
        }

        #[test]
        fn unrepairable_output_is_malformed() {
            let raw = r#"{"debate_transcript": [ {"agent": "Budget Agent""#;
            let err = parse_synthesis(raw, &ctx("2026-03-15", "2026-03-16"), &options()).unwrap_err();
            assert!(matches!(err, SynthesisError::Malformed(_)));
        }

        #[test]
        fn prose_is_malformed() {
            let err = parse_synthesis("Sorry, I can't.", &ctx("", ""), &options()).unwrap_err();
            assert!(matches!(err, SynthesisError::Malformed(_)));
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn wrong_transcript_length_is_rejected() {
            let mut value = output(vec![day(1, "")]);
            value["debate_transcript"] = json!(transcript()[..5].to_vec());
            let err = parse_synthesis(&value.to_string(), &ctx("2026-03-15", "2026-03-16"), &options())
                .unwrap_err();
            assert!(matches!(err, SynthesisError::TranscriptShape(_)));
        }

        #[test]
        fn wrong_speaker_order_is_rejected() {
            let mut value = output(vec![day(1, "")]);
            value["debate_transcript"][1] = argument("Experience Agent");
            let err = parse_synthesis(&value.to_string(), &ctx("2026-03-15", "2026-03-16"), &options())
                .unwrap_err();
            assert!(matches!(err, SynthesisError::TranscriptShape(_)));
        }

        #[test]
        fn wrong_day_count_is_rejected() {
            let raw = output(vec![day(1, "")]).to_string();
            let err = parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-18"), &options()).unwrap_err();
            assert!(matches!(err, SynthesisError::ItineraryShape(_)));
        }

        #[test]
        fn missing_slot_is_rejected() {
            let mut d = day(1, "");
            d["schedule"] = json!([d["schedule"][0].clone(), d["schedule"][2].clone()]);
            let raw = output(vec![d]).to_string();
            let err = parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-16"), &options()).unwrap_err();
            assert!(matches!(err, SynthesisError::ItineraryShape(_)));
        }

        #[test]
        fn unparseable_dates_use_three_days() {
            let raw = output(vec![day(1, ""), day(2, ""), day(3, "")]).to_string();
            assert!(parse_synthesis(&raw, &ctx("", ""), &options()).is_ok());
        }
    }

    mod normalization {
        use super::*;

        #[test]
        fn flight_hotel_and_activities_come_from_candidates() {
            let raw = output(vec![day(1, "")]).to_string();
            let opts = options();
            let result = parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-16"), &opts).unwrap();
            assert_eq!(result.final_decision.flight, opts.flights.first().cloned());
            assert_eq!(result.final_decision.hotel, opts.hotels.first().cloned());
            assert_eq!(result.final_decision.activities, opts.activities);
        }

        #[test]
        fn day_numbers_and_empty_dates_follow_start_date() {
            let raw = output(vec![day(7, ""), day(7, "2026-03-16")]).to_string();
            let result = parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-17"), &options()).unwrap();
            let days: Vec<_> = result
                .final_decision
                .itinerary
                .iter()
                .map(|d| (d.day, d.date.as_str()))
                .collect();
            assert_eq!(days, vec![(1, "2026-03-15"), (2, "2026-03-16")]);
        }

        #[test]
        fn fills_blank_theme_and_time() {
            let raw = output(vec![day(1, "")]).to_string();
            let result = parse_synthesis(&raw, &ctx("2026-03-15", "2026-03-16"), &options()).unwrap();
            let plan = &result.final_decision.itinerary[0];
            assert_eq!(plan.theme, "Day 1");
            assert_eq!(plan.schedule[1].time, "1:00 PM");
        }

        #[test]
        fn canonicalizes_agent_names() {
            let mut value = output(vec![day(1, "")]);
            value["debate_transcript"][0] = argument("💰 budget agent");
            let result =
                parse_synthesis(&value.to_string(), &ctx("2026-03-15", "2026-03-16"), &options()).unwrap();
            assert_eq!(result.debate_transcript[0].agent_name, "Budget Agent");
        }
    }

    mod fallback {
        use super::*;

        #[test]
        fn safe_fallback_shape() {
            let opts = options();
            let result = safe_fallback(&opts);
            assert!(result.is_fallback);
            assert_eq!(result.debate_transcript.len(), 1);
            assert_eq!(result.debate_transcript[0].agent_name, "Budget Agent");
            assert_eq!(result.final_decision.flight, opts.flights.first().cloned());
            assert!(result.final_decision.itinerary.is_empty());
            assert_eq!(result.final_decision.activities.len(), 2);
        }

        #[test]
        fn safe_fallback_without_candidates_has_nulls() {
            let result = safe_fallback(&AvailableOptions::default());
            assert!(result.final_decision.flight.is_none());
            assert!(result.final_decision.hotel.is_none());
            let json = serde_json::to_value(&result).unwrap();
            assert_eq!(json["final_decision"]["flight"], Value::Null);
            assert!(json.get("is_fallback").is_none());
        }
    }

    mod prompt {
        use super::*;

        #[test]
        fn names_day_count_and_agents() {
            let prompt = synthesis_prompt(&ctx("2026-03-15", "2026-03-20"), &options());
            assert!(prompt.contains("Number of days: 5"));
            assert!(prompt.contains("Create 5 day entries"));
            assert!(prompt.contains("Budget Agent (cost savings focus)"));
            assert!(prompt.contains("\"date\": \"2026-03-15\""));
            assert!(prompt.contains("Fort Aguada"));
        }
    }

    #[test]
    fn selections_become_candidates() {
        let mut info = CollectedInfo::new();
        info.selected_flight = options().flights.first().cloned();
        info.add_activity(options().activities[0].clone());
        let opts = AvailableOptions::from_selections(&info);
        assert_eq!(opts.flights.len(), 1);
        assert!(opts.hotels.is_empty());
        assert_eq!(opts.activities.len(), 1);
    }
}
