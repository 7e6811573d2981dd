//! Fact extraction from free-text utterances.
//!
//! Pulls cities, dates and a budget out of what the traveller typed using a
//! fixed set of pattern rules. Extraction is heuristic and never fails: an
//! utterance that matches nothing leaves the collected facts untouched.

use std::ops::Range;

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::trip::{City, CollectedInfo, Stage};

/// Year assumed for dates written without one.
pub const DEFAULT_YEAR: i32 = 2026;

static CITY_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"from\s+([a-z\s]+?)\s+to\s+([a-z]+(?:\s+[a-z]+)?)").expect("valid city pair regex")
});

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid iso date regex"));

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

/// "17th February", "17 of feb 2027"
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{}\b(?:,?\s+(\d{{4}})\b)?",
        MONTH
    ))
    .expect("valid day-month regex")
});

/// "February 17", "feb 17th, 2027"
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{}\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?",
        MONTH
    ))
    .expect("valid month-day regex")
});

static DAY_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3})\s*days?\b").expect("valid day count regex"));

static DIGIT_GROUPING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d),(\d{3})").expect("valid digit grouping regex"));

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit run regex"));

/// Which fields an extraction pass newly set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractedFacts {
    pub departure_city: bool,
    pub destination: bool,
    pub start_date: bool,
    pub end_date: bool,
    pub budget: bool,
}

impl ExtractedFacts {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Names of the fields that were set, in extraction order.
    pub fn fields(&self) -> Vec<&'static str> {
        [
            (self.departure_city, "departure_city"),
            (self.destination, "destination"),
            (self.start_date, "start_date"),
            (self.end_date, "end_date"),
            (self.budget, "budget"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

/// Applies every extraction rule to `utterance`, filling empty fields of `info`.
///
/// `stage` decides where a lone city mention goes: departure while greeting,
/// destination while asking for it.
pub fn extract(utterance: &str, info: &mut CollectedInfo, stage: Stage) -> ExtractedFacts {
    let mut facts = ExtractedFacts::default();
    let lower = utterance.to_lowercase();

    extract_cities(&lower, info, stage, &mut facts);
    let date_spans = extract_dates(&lower, info, &mut facts);
    extract_budget(&lower, &date_spans, info, &mut facts);

    if !facts.is_empty() {
        tracing::debug!(fields = ?facts.fields(), stage = %stage, "extracted trip facts");
    }
    facts
}

fn extract_cities(lower: &str, info: &mut CollectedInfo, stage: Stage, facts: &mut ExtractedFacts) {
    if let Some(caps) = CITY_PAIR.captures(lower) {
        let from = caps.get(1).and_then(|m| City::find_in(m.as_str()));
        let to = caps.get(2).and_then(|m| City::find_in(m.as_str()));
        if let Some(city) = from.filter(|_| info.departure_city.is_none()) {
            info.departure_city = Some(city.code.to_string());
            facts.departure_city = true;
        }
        if let Some(city) = to.filter(|_| info.destination.is_none()) {
            info.destination = Some(city.code.to_string());
            facts.destination = true;
        }
        return;
    }

    let Some(city) = City::find_in(lower) else {
        return;
    };
    if stage == Stage::Greeting && info.departure_city.is_none() {
        info.departure_city = Some(city.code.to_string());
        facts.departure_city = true;
    } else if stage == Stage::Departure && info.destination.is_none() {
        info.destination = Some(city.code.to_string());
        facts.destination = true;
    }
}

/// Returns the byte spans of every date expression found, for budget masking.
fn extract_dates(lower: &str, info: &mut CollectedInfo, facts: &mut ExtractedFacts) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = ISO_DATE.find_iter(lower).map(|m| m.range()).collect();
    spans.extend(DAY_MONTH.find_iter(lower).map(|m| m.range()));
    spans.extend(MONTH_DAY.find_iter(lower).map(|m| m.range()));

    if let Some(date) = first_explicit_date(lower) {
        match info.start_date {
            None => {
                info.start_date = Some(date);
                facts.start_date = true;
            }
            Some(start) if date != start && info.end_date.is_none() => {
                if info.try_set_end_date(date) {
                    facts.end_date = true;
                } else {
                    tracing::debug!(start = %start, end = %date, "ignored end date before start date");
                }
            }
            Some(_) => {}
        }
    }

    if let (Some(start), None) = (info.start_date, info.end_date) {
        let end = DAY_COUNT
            .captures(lower)
            .and_then(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
            .and_then(|n| start.checked_add_days(Days::new(n)));
        if let Some(end) = end {
            info.end_date = Some(end);
            facts.end_date = true;
        }
    }

    spans
}

/// ISO dates take precedence; otherwise the earliest month-name date wins.
fn first_explicit_date(lower: &str) -> Option<NaiveDate> {
    if let Some(date) = ISO_DATE.captures_iter(lower).find_map(|caps| {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }) {
        return Some(date);
    }

    let day_month = DAY_MONTH.captures_iter(lower).find_map(|caps| {
        let at = caps.get(0)?.start();
        let day = caps.get(1)?.as_str().parse().ok()?;
        let month = month_number(caps.get(2)?.as_str())?;
        let year = year_or_default(caps.get(3).map(|m| m.as_str()));
        NaiveDate::from_ymd_opt(year, month, day).map(|d| (at, d))
    });
    let month_day = MONTH_DAY.captures_iter(lower).find_map(|caps| {
        let at = caps.get(0)?.start();
        let month = month_number(caps.get(1)?.as_str())?;
        let day = caps.get(2)?.as_str().parse().ok()?;
        let year = year_or_default(caps.get(3).map(|m| m.as_str()));
        NaiveDate::from_ymd_opt(year, month, day).map(|d| (at, d))
    });

    match (day_month, month_day) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a.1 } else { b.1 }),
        (a, b) => a.or(b).map(|(_, d)| d),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn year_or_default(year: Option<&str>) -> i32 {
    year.and_then(|y| y.parse().ok()).unwrap_or(DEFAULT_YEAR)
}

fn extract_budget(lower: &str, date_spans: &[Range<usize>], info: &mut CollectedInfo, facts: &mut ExtractedFacts) {
    if info.budget.is_some() {
        return;
    }

    // Blank out date expressions so years and days are never read as money.
    let mut masked = lower.as_bytes().to_vec();
    for span in date_spans {
        for byte in &mut masked[span.clone()] {
            *byte = b' ';
        }
    }
    let masked = String::from_utf8_lossy(&masked);
    let ungrouped = DIGIT_GROUPING.replace_all(&masked, "$1$2");

    let budget = DIGIT_RUN
        .find_iter(&ungrouped)
        .filter(|m| (4..=6).contains(&m.as_str().len()))
        .find_map(|m| m.as_str().parse::<u64>().ok().filter(|b| *b > 0));

    if let Some(budget) = budget {
        info.budget = Some(budget);
        facts.budget = true;
    }
}
