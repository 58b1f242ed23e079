//! Small shared helpers

use chrono::NaiveDate;

/// Round to 2 decimal places, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Inclusive day-by-day iterator over [start, end].
pub fn daterange(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// ISO 8601 date string (YYYY-MM-DD).
pub fn to_iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(184.999), 185.0);
        assert_eq!(round2(0.3 + 0.3), 0.6);
        assert_eq!(round2(-2.346), -2.35);
        assert_eq!(round2(7.5), 7.5);
    }

    #[test]
    fn test_daterange_inclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 8, 2).unwrap();
        let days: Vec<String> = daterange(start, end).map(to_iso).collect();
        assert_eq!(days, vec!["2025-07-30", "2025-07-31", "2025-08-01", "2025-08-02"]);
    }

    #[test]
    fn test_daterange_single_day() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(daterange(d, d).count(), 1);
    }
}
