//! External-event demand impact
//!
//! Turns a bounded external search into a per-date impact score in [0, 1].
//! Two-tier scoring: explicit date spans found in result titles are
//! preferred; only when no title carries a recognizable date does the
//! adapter fall back to a generic weekend boost. The fallback tier is the
//! defense against inflating ordinary weekends on weak evidence, so the
//! ordering between the tiers is load-bearing.

pub mod cache;
pub mod datespan;


use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, warn};

use crate::client::SearchProvider;
use crate::types::SourceRef;
use crate::utils::{daterange, round2, to_iso};
use cache::{CacheEntry, ImpactCache};
use datespan::{merge_spans, DateSpanExtractor, MONTH_NAMES};

/// Keywords suggesting a demand-relevant event.
const WEEKEND_WORDS: &[&str] = &[
    "concert",
    "festival",
    "match",
    "game",
    "marathon",
    "expo",
    "tournament",
    "cup",
    "show",
    "conference",
];

const WEEKDAY_NAMES: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Per-event impact contribution for an explicitly dated span.
const SPAN_IMPACT: f64 = 0.3;
/// Saturation ceiling when multiple dated events stack on one day.
const SPAN_IMPACT_CAP: f64 = 0.9;

/// Adapter producing daily demand-impact scores from an external search,
/// with a read-through file cache.
pub struct EventImpactAdapter {
    provider: Option<Box<dyn SearchProvider>>,
    cache: ImpactCache,
    extractor: DateSpanExtractor,
}

impl EventImpactAdapter {
    pub fn new(cache_dir: impl Into<PathBuf>, provider: Option<Box<dyn SearchProvider>>) -> Self {
        Self {
            provider,
            cache: ImpactCache::new(cache_dir),
            extractor: DateSpanExtractor::new(),
        }
    }

    /// Fetch per-date impact scores for `location` over `[start, end]`.
    ///
    /// Returns `(daily impact map, source citations)`. Never errors:
    /// external failures degrade to empty results.
    pub async fn fetch_event_impacts(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
        max_results: usize,
        disable_external: bool,
        force_refresh: bool,
    ) -> (BTreeMap<String, f64>, Vec<SourceRef>) {
        let normalized_location = location.trim().to_lowercase();
        let key = ImpactCache::cache_key(
            &normalized_location,
            &to_iso(start),
            &to_iso(end),
            max_results,
        );
        if !force_refresh {
            if let Some(entry) = self.cache.read(&key) {
                return (entry.daily, entry.sources);
            }
        }

        let provider = match &self.provider {
            Some(p) if !disable_external => p,
            _ => {
                debug!("External events search disabled or unconfigured");
                return (BTreeMap::new(), Vec::new());
            }
        };

        let query = format!(
            "major events in {} between {} and {} that impact hotel demand",
            location,
            to_iso(start),
            to_iso(end)
        );
        let hits = match provider.search(&query, max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(
                    "Events search via {} failed, continuing without external signal: {}",
                    provider.name(),
                    e
                );
                return (BTreeMap::new(), Vec::new());
            }
        };

        let sources: Vec<SourceRef> = hits
            .iter()
            .map(|h| SourceRef {
                title: h.title.clone(),
                url: h.url.clone(),
            })
            .collect();

        let mut daily: BTreeMap<String, f64> =
            daterange(start, end).map(|d| (to_iso(d), 0.0)).collect();

        // Tier 1: explicit date spans in titles. Spans inside one title are
        // merged before scoring; separate titles stack up to the cap.
        let mut found_any_span = false;
        for hit in &hits {
            let spans = self.extractor.extract(&hit.title, start.year());
            if spans.is_empty() {
                continue;
            }
            found_any_span = true;
            let clamped: Vec<(NaiveDate, NaiveDate)> = spans
                .into_iter()
                .filter_map(|(s, e)| {
                    let s = s.max(start);
                    let e = e.min(end);
                    (s <= e).then_some((s, e))
                })
                .collect();
            for (span_start, span_end) in merge_spans(clamped) {
                for d in daterange(span_start, span_end) {
                    if let Some(score) = daily.get_mut(&to_iso(d)) {
                        *score = (*score + SPAN_IMPACT).min(SPAN_IMPACT_CAP);
                    }
                }
            }
        }

        // Tier 2: no dated title anywhere -> weekend heuristic from
        // indicator keywords, weekdays stay at zero.
        if !found_any_span {
            let found_weekendish = hits.iter().any(|h| has_weekend_word(&h.title));
            let found_rich_context = hits
                .iter()
                .any(|h| has_month_name(&h.title) && has_weekday_name(&h.title));
            let weekend_score = if found_rich_context {
                0.5
            } else if found_weekendish {
                0.3
            } else {
                0.0
            };
            if weekend_score > 0.0 {
                for d in daterange(start, end) {
                    if matches!(d.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun) {
                        if let Some(score) = daily.get_mut(&to_iso(d)) {
                            *score = weekend_score;
                        }
                    }
                }
            }
        }

        for score in daily.values_mut() {
            *score = round2(*score);
        }

        let entry = CacheEntry { daily, sources };
        self.cache.write(&key, &entry);
        (entry.daily, entry.sources)
    }
}

fn has_weekend_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    WEEKEND_WORDS.iter().any(|w| lower.contains(w))
}

fn has_month_name(text: &str) -> bool {
    let lower = text.to_lowercase();
    MONTH_NAMES.iter().any(|m| lower.contains(m))
}

fn has_weekday_name(text: &str) -> bool {
    let lower = text.to_lowercase();
    WEEKDAY_NAMES.iter().any(|w| lower.contains(w))
}
