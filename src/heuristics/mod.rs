//! Deterministic pricing heuristics
//!
//! A pure function over a single date. Every rule that fires appends its
//! driver label, so the output band is fully explainable.

#[cfg(test)]
mod tests;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::utils::round2;

/// Fallback nightly base rate when no published rate is available.
pub const DEFAULT_BASE_RATE: f64 = 150.0;

/// Month seasonality deltas. Shared with the ML feature pipeline as the
/// seasonality prior.
const SEASONALITY: &[(u32, f64)] = &[(6, 10.0), (7, 15.0), (8, 10.0), (12, 5.0)];

/// Seasonality delta for a month, 0.0 outside the high/low season table.
pub fn month_seasonality(month: u32) -> f64 {
    SEASONALITY
        .iter()
        .find(|(m, _)| *m == month)
        .map(|(_, delta)| *delta)
        .unwrap_or(0.0)
}

/// Optional per-date signals feeding the heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceInputs {
    pub published_rate: Option<f64>,
    pub occupancy_pct: Option<f64>,
    pub pickup_24h: Option<f64>,
    pub event_impact: Option<f64>,
}

/// Heuristic output band plus the drivers that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceOutput {
    pub price_rec: f64,
    pub price_min: f64,
    pub price_max: f64,
    pub drivers: Vec<String>,
}

/// Compute the heuristic price band for a single date.
///
/// Weekend uplift applies to Friday/Saturday only and midweek softness to
/// Tuesday/Wednesday only; Sunday, Monday and Thursday get no day-of-week
/// adjustment.
pub fn compute_price_for_date(date: NaiveDate, inputs: &PriceInputs) -> PriceOutput {
    let mut base = match inputs.published_rate {
        Some(rate) if rate > 0.0 => rate,
        _ => DEFAULT_BASE_RATE,
    };
    let mut drivers: Vec<String> = Vec::new();

    match date.weekday() {
        Weekday::Fri | Weekday::Sat => {
            base += 20.0;
            drivers.push("Weekend uplift".to_string());
        }
        Weekday::Tue | Weekday::Wed => {
            base -= 10.0;
            drivers.push("Midweek softness".to_string());
        }
        _ => {}
    }

    let seasonality = month_seasonality(date.month());
    if seasonality != 0.0 {
        base += seasonality;
        drivers.push("Seasonality".to_string());
    }

    if let Some(impact) = inputs.event_impact {
        if impact > 0.0 {
            base += round2(25.0 * impact.clamp(0.0, 1.0));
            drivers.push("Event impact".to_string());
        }
    }

    // Occupancy is a fraction in [0,1]: reward high, soften for very low.
    if let Some(occ) = inputs.occupancy_pct {
        if occ >= 0.8 {
            let uplift = (8.0 + (occ - 0.8) * 100.0 * 0.5).min(20.0); // ~8..18
            base += uplift;
            drivers.push("High occupancy".to_string());
        } else if (0.0..=0.3).contains(&occ) {
            let softness = (5.0 + (0.3 - occ) * 100.0 * 0.3).min(15.0); // ~5..14
            base -= softness;
            drivers.push("Low occupancy softness".to_string());
        }
    }

    if let Some(pickup) = inputs.pickup_24h {
        if pickup > 0.0 {
            // Capped contribution from recent pickup
            base += (2.0 + 0.8 * pickup).min(10.0);
            drivers.push("High pickup".to_string());
        }
    }

    let price_rec = round2(base);
    let mut price_min = round2((price_rec - 20.0).max(0.0));
    let mut price_max = round2(price_rec + 20.0);
    if price_min >= price_rec {
        price_min = round2(price_rec - 10.0);
    }
    if price_max <= price_rec {
        price_max = round2(price_rec + 10.0);
    }

    PriceOutput {
        price_rec,
        price_min,
        price_max,
        drivers,
    }
}
