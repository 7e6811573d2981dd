//! System prompt for the fact-collection conversation.

use crate::domain::trip::{CollectedInfo, Stage};

/// Upper bound on reply length requested from the model.
pub const REPLY_MAX_TOKENS: u32 = 150;
pub const REPLY_TEMPERATURE: f32 = 0.7;

/// Builds the instructions for the next assistant reply.
///
/// Carries the current stage and a snapshot of what has been collected; the
/// conversation history is sent separately as chat messages.
pub fn collection_system_prompt(stage: Stage, info: &CollectedInfo) -> String {
    let collected = serde_json::to_string_pretty(info).unwrap_or_else(|_| "{}".to_string());
    let stages = Stage::ALL
        .iter()
        .filter(|s| **s != Stage::DestinationSet)
        .map(|s| format!("- {}: {}", s.as_str(), s.directive()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful AI travel assistant. Your job is to collect travel information step by step.

Current stage: {stage}
Collected so far: {collected}

RULES:
1. Ask ONE question at a time
2. Be conversational and friendly
3. Extract information from user's natural language
4. When you have departure_city and destination, ALWAYS use IATA codes (Bangalore=BLR, Mumbai=BOM, Delhi=DEL, Goa=GOI, etc)
5. For dates, convert to YYYY-MM-DD format
6. Keep responses SHORT (2-3 sentences max)

STAGES:
{stages}

Current stage: {stage}
"#,
        stage = stage,
        collected = collected,
        stages = stages,
    )
}
