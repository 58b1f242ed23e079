//! Column resolution shared by the baseline loader and model training
//!
//! PMS exports name their columns inconsistently, so each canonical field
//! carries a synonym set. Matching is name-based and case-insensitive.
//! Keeping the table in one place guarantees the loader and the training
//! ingestion never drift apart.

use chrono::NaiveDate;

/// Synonyms for the date column.
pub const DATE_SYNONYMS: &[&str] = &["date", "day", "dt"];

/// Synonyms for the published-rate column. The same set doubles as the
/// regression target during training (ARR/APR show up in PMS exports).
pub const RATE_SYNONYMS: &[&str] = &["published_rate", "adr", "rate", "price", "arr", "apr"];

/// Synonyms for the occupancy column.
pub const OCCUPANCY_SYNONYMS: &[&str] = &["occupancy_pct", "occupancy", "occ"];

/// Synonyms for the 24h pickup column.
pub const PICKUP_SYNONYMS: &[&str] = &["pickup_24h", "pickup", "new_bookings_24h"];

/// Header indices resolved against the synonym table. Any field may be
/// missing; callers decide which combinations are usable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvedColumns {
    pub date: Option<usize>,
    pub rate: Option<usize>,
    pub occupancy: Option<usize>,
    pub pickup: Option<usize>,
}

/// Resolve a CSV header row to column indices. First match wins per field.
pub fn resolve_columns(headers: &csv::StringRecord) -> ResolvedColumns {
    let mut cols = ResolvedColumns::default();
    for (idx, raw) in headers.iter().enumerate() {
        let name = raw.trim().to_lowercase();
        if cols.date.is_none() && DATE_SYNONYMS.contains(&name.as_str()) {
            cols.date = Some(idx);
        }
        if cols.rate.is_none() && RATE_SYNONYMS.contains(&name.as_str()) {
            cols.rate = Some(idx);
        }
        if cols.occupancy.is_none() && OCCUPANCY_SYNONYMS.contains(&name.as_str()) {
            cols.occupancy = Some(idx);
        }
        if cols.pickup.is_none() && PICKUP_SYNONYMS.contains(&name.as_str()) {
            cols.pickup = Some(idx);
        }
    }
    cols
}

/// Parse a date cell, preferring ISO then day-first formats (EU-style PMS
/// exports), then month-first as a last resort.
pub fn parse_cell_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    const FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%m/%d/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a numeric cell, tolerating surrounding whitespace and blanks.
pub fn parse_cell_f64(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Occupancy cells may be fractions (0.85) or percentages (85). Values
/// above 1.5 are treated as percentages.
pub fn normalize_occupancy(v: f64) -> f64 {
    if v > 1.5 {
        v / 100.0
    } else {
        v
    }
}
