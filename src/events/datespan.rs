//! Date-span extraction from free text
//!
//! Event titles mention dates in loose shapes ("Nov 12-14, 2025",
//! "12 November", "3rd-5th August"). This extractor is best-effort and sits
//! behind a narrow interface so a more robust parser can replace it without
//! touching the orchestrator.

use chrono::NaiveDate;
use regex::Regex;

/// Lowercase full month names, used for fallback indicator checks.
pub const MONTH_NAMES: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const MONTH_ALT: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

const DAY: &str = r"(\d{1,2})(?:st|nd|rd|th)?\b";
const RANGE_SEP: &str = r"\s*(?:-|–|to|through)\s*";
const YEAR: &str = r"(?:,?\s+(\d{4})\b)?";

/// Extracts date or date-range expressions from titles.
pub struct DateSpanExtractor {
    month_first: Regex,
    day_first: Regex,
}

impl DateSpanExtractor {
    pub fn new() -> Self {
        // "Nov 12", "November 12-14, 2025", "Sept 3rd"
        let month_first = Regex::new(&format!(
            r"(?i)\b({MONTH_ALT})\.?\s+{DAY}(?:{RANGE_SEP}{DAY})?{YEAR}"
        ))
        .unwrap();
        // "12 November", "12-14 Nov 2025", "3rd-5th August"
        let day_first = Regex::new(&format!(
            r"(?i)\b{DAY}(?:{RANGE_SEP}{DAY})?\s+({MONTH_ALT})\b\.?{YEAR}"
        ))
        .unwrap();
        Self { month_first, day_first }
    }

    /// Extract (start, end) spans from text. A missing year defaults to
    /// `default_year`. Single dates come back as one-day spans. Spans are
    /// not merged or clamped here.
    pub fn extract(&self, text: &str, default_year: i32) -> Vec<(NaiveDate, NaiveDate)> {
        let mut spans = Vec::new();

        for caps in self.month_first.captures_iter(text) {
            let month = month_number(&caps[1]);
            let day1 = caps[2].parse::<u32>().ok();
            let day2 = caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok());
            let year = caps
                .get(4)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(default_year);
            if let (Some(month), Some(day1)) = (month, day1) {
                push_span(&mut spans, year, month, day1, day2);
            }
        }

        for caps in self.day_first.captures_iter(text) {
            let day1 = caps[1].parse::<u32>().ok();
            let day2 = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            let month = month_number(&caps[3]);
            let year = caps
                .get(4)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(default_year);
            if let (Some(month), Some(day1)) = (month, day1) {
                push_span(&mut spans, year, month, day1, day2);
            }
        }

        spans
    }
}

impl Default for DateSpanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn push_span(
    spans: &mut Vec<(NaiveDate, NaiveDate)>,
    year: i32,
    month: u32,
    day1: u32,
    day2: Option<u32>,
) {
    let start = match NaiveDate::from_ymd_opt(year, month, day1) {
        Some(d) => d,
        None => return,
    };
    let end = day2
        .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
        .filter(|d| *d >= start)
        .unwrap_or(start);
    spans.push((start, end));
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let prefix = lower.get(..3)?;
    let n = match prefix {
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
    Some(n)
}

/// Merge overlapping or near-adjacent spans (gap of at most one free day).
pub fn merge_spans(mut spans: Vec<(NaiveDate, NaiveDate)>) -> Vec<(NaiveDate, NaiveDate)> {
    if spans.is_empty() {
        return spans;
    }
    spans.sort();
    let mut merged: Vec<(NaiveDate, NaiveDate)> = vec![spans[0]];
    for (start, end) in spans.into_iter().skip(1) {
        let last = merged
            .last_mut()
            .expect("merged is seeded with the first span");
        if (start - last.1).num_days() <= 2 {
            last.1 = last.1.max(end);
        } else {
            merged.push((start, end));
        }
    }
    merged
}
