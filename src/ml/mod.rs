//! Regression model for price prediction
//!
//! Feature engineering shared between training and inference, a
//! gradient-boosted regression ensemble, and artifact persistence. The
//! feature order is part of the serialized contract: training and inference
//! both go through [`build_features_for_date`], and the order is recorded in
//! the model metadata.

pub mod gbrt;
pub mod model;


pub use gbrt::{GbrtParams, GradientBoostedTrees, StandardScaler};
pub use model::{ModelMeta, PriceModel, MODEL_FILENAME, MODEL_META_FILENAME};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::heuristics::{month_seasonality, DEFAULT_BASE_RATE};

/// Canonical feature order. Serialized into the model metadata and checked
/// at load time.
pub const FEATURE_ORDER: &[&str] = &[
    "dow",
    "month",
    "is_weekend",
    "published_rate",
    "occupancy_pct",
    "pickup_24h",
    "event_impact",
    "seasonality_prior",
];

/// Build the feature vector for one date, aligned to [`FEATURE_ORDER`].
///
/// Absent or negative optional signals default to zero; an absent or
/// non-positive published rate falls back to the default base rate.
pub fn build_features_for_date(
    date: NaiveDate,
    published_rate: Option<f64>,
    occupancy_pct: Option<f64>,
    pickup_24h: Option<f64>,
    event_impact: Option<f64>,
) -> Vec<f64> {
    let dow = date.weekday().num_days_from_monday() as f64;
    let month = date.month();
    let is_weekend = matches!(date.weekday(), Weekday::Fri | Weekday::Sat);
    let pub_rate = match published_rate {
        Some(r) if r > 0.0 => r,
        _ => DEFAULT_BASE_RATE,
    };
    let occ = occupancy_pct.filter(|v| *v >= 0.0).unwrap_or(0.0);
    let pick = pickup_24h.filter(|v| *v >= 0.0).unwrap_or(0.0);
    let event = event_impact.filter(|v| *v >= 0.0).unwrap_or(0.0);

    vec![
        dow,
        month as f64,
        if is_weekend { 1.0 } else { 0.0 },
        pub_rate,
        occ,
        pick,
        event,
        month_seasonality(month),
    ]
}
