//! Core data types shared across the engine
//!
//! Everything here is plain structured data with no behavior, safe to
//! serialize straight into a response body or CSV export.

use serde::{Deserialize, Serialize};

/// A request to score a hotel/room-type over an inclusive date range.
///
/// Dates are ISO 8601 strings. Range ordering is validated by the engine;
/// window-size limits (e.g. max 90 days) are the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    pub hotel_id: i64,
    pub room_type_code: String,
    pub from_date: String,
    pub to_date: String,
    /// "City, Country" used for the external events search. None disables it.
    pub location: Option<String>,
}

/// One priced day in the output sequence.
///
/// Drivers record which rules fired, in evaluation order. Duplicates are
/// allowed and never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingItem {
    pub date: String,
    pub room_type_code: String,
    pub price_rec: f64,
    pub price_min: f64,
    pub price_max: f64,
    pub drivers: Vec<String>,
}

/// Optional per-date operational metrics loaded from the data directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub occupancy_pct: Option<f64>,
    pub pickup_24h: Option<f64>,
}

/// A citation for an external search result that informed event impacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

/// Run-level metadata returned alongside the priced items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub hotel_id: i64,
    pub room_type_code: String,
    pub from: String,
    pub to: String,
    pub location: Option<String>,
    pub num_items: usize,
    pub baseline_days: usize,
    pub metrics_days: usize,
    pub sources: Vec<SourceRef>,
    pub events_disabled: bool,
    pub max_search_results: usize,
    pub ml_loaded: bool,
    pub ml_weight: f64,
    pub smoothing_window: usize,
}
