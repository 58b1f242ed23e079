//! Tests for the pricing heuristics

use chrono::NaiveDate;

use super::{compute_price_for_date, month_seasonality, PriceInputs};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_friday_in_july_no_baseline() {
    // 2025-07-04 is a Friday: 150 base + 20 weekend + 15 July seasonality
    let out = compute_price_for_date(date(2025, 7, 4), &PriceInputs::default());
    assert_eq!(out.price_rec, 185.00);
    assert_eq!(out.price_min, 165.00);
    assert_eq!(out.price_max, 205.00);
    assert_eq!(out.drivers, vec!["Weekend uplift", "Seasonality"]);
}

#[test]
fn test_midweek_with_published_rate() {
    // 2025-02-12 is a Wednesday: 200 - 10 midweek, no February seasonality
    let inputs = PriceInputs {
        published_rate: Some(200.0),
        ..Default::default()
    };
    let out = compute_price_for_date(date(2025, 2, 12), &inputs);
    assert_eq!(out.price_rec, 190.00);
    assert_eq!(out.drivers, vec!["Midweek softness"]);
}

#[test]
fn test_sunday_gets_no_day_of_week_adjustment() {
    // 2025-02-16 is a Sunday: no uplift despite being "weekend"
    let out = compute_price_for_date(date(2025, 2, 16), &PriceInputs::default());
    assert_eq!(out.price_rec, 150.00);
    assert!(out.drivers.is_empty());
}

#[test]
fn test_monday_and_thursday_untouched() {
    // 2025-02-17 Monday, 2025-02-20 Thursday
    for d in [date(2025, 2, 17), date(2025, 2, 20)] {
        let out = compute_price_for_date(d, &PriceInputs::default());
        assert_eq!(out.price_rec, 150.00, "{d} should get no adjustment");
    }
}

#[test]
fn test_event_impact_clamped() {
    let inputs = PriceInputs {
        event_impact: Some(2.0), // clamped to 1.0 -> +25
        ..Default::default()
    };
    // 2025-01-06 Monday, no seasonality
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 175.00);
    assert_eq!(out.drivers, vec!["Event impact"]);
}

#[test]
fn test_zero_event_impact_does_not_fire() {
    let inputs = PriceInputs {
        event_impact: Some(0.0),
        ..Default::default()
    };
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert!(out.drivers.is_empty());
}

#[test]
fn test_high_occupancy_uplift() {
    let inputs = PriceInputs {
        occupancy_pct: Some(0.9),
        ..Default::default()
    };
    // Monday base 150 + min(20, 8 + 0.1*100*0.5) = 150 + 13
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 163.00);
    assert_eq!(out.drivers, vec!["High occupancy"]);
}

#[test]
fn test_high_occupancy_uplift_capped() {
    let inputs = PriceInputs {
        occupancy_pct: Some(1.0),
        ..Default::default()
    };
    // 8 + 0.2*100*0.5 = 18, under the 20 cap
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 168.00);
}

#[test]
fn test_low_occupancy_softness() {
    let inputs = PriceInputs {
        occupancy_pct: Some(0.1),
        ..Default::default()
    };
    // 150 - min(15, 5 + 0.2*100*0.3) = 150 - 11
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 139.00);
    assert_eq!(out.drivers, vec!["Low occupancy softness"]);
}

#[test]
fn test_mid_band_occupancy_no_adjustment() {
    for occ in [0.31, 0.5, 0.79] {
        let inputs = PriceInputs {
            occupancy_pct: Some(occ),
            ..Default::default()
        };
        let out = compute_price_for_date(date(2025, 1, 6), &inputs);
        assert_eq!(out.price_rec, 150.00, "occ {occ} should not adjust");
    }
}

#[test]
fn test_negative_occupancy_ignored() {
    let inputs = PriceInputs {
        occupancy_pct: Some(-0.5),
        ..Default::default()
    };
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 150.00);
    assert!(out.drivers.is_empty());
}

#[test]
fn test_pickup_contribution_capped() {
    let inputs = PriceInputs {
        pickup_24h: Some(3.0),
        ..Default::default()
    };
    // 2 + 0.8*3 = 4.4
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 154.40);
    assert_eq!(out.drivers, vec!["High pickup"]);

    let inputs = PriceInputs {
        pickup_24h: Some(50.0),
        ..Default::default()
    };
    let out = compute_price_for_date(date(2025, 1, 6), &inputs);
    assert_eq!(out.price_rec, 160.00); // capped at +10
}

#[test]
fn test_driver_order_follows_rule_order() {
    // Friday in August with everything firing
    let inputs = PriceInputs {
        published_rate: Some(100.0),
        occupancy_pct: Some(0.95),
        pickup_24h: Some(5.0),
        event_impact: Some(0.5),
    };
    let out = compute_price_for_date(date(2025, 8, 1), &inputs);
    assert_eq!(
        out.drivers,
        vec!["Weekend uplift", "Seasonality", "Event impact", "High occupancy", "High pickup"]
    );
}

#[test]
fn test_determinism() {
    let inputs = PriceInputs {
        published_rate: Some(123.45),
        occupancy_pct: Some(0.85),
        pickup_24h: Some(2.0),
        event_impact: Some(0.3),
    };
    let a = compute_price_for_date(date(2025, 6, 14), &inputs);
    let b = compute_price_for_date(date(2025, 6, 14), &inputs);
    assert_eq!(a, b);
}

#[test]
fn test_band_is_strict() {
    let out = compute_price_for_date(date(2025, 7, 4), &PriceInputs::default());
    assert!(out.price_min < out.price_rec);
    assert!(out.price_rec < out.price_max);
    assert!(out.price_min >= 0.0);
}

#[test]
fn test_month_seasonality_table() {
    assert_eq!(month_seasonality(6), 10.0);
    assert_eq!(month_seasonality(7), 15.0);
    assert_eq!(month_seasonality(8), 10.0);
    assert_eq!(month_seasonality(12), 5.0);
    assert_eq!(month_seasonality(1), 0.0);
    assert_eq!(month_seasonality(11), 0.0);
}
