//! Tests for baseline ingestion

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::columns::{normalize_occupancy, parse_cell_date, resolve_columns};
use super::{load_baseline_rates, load_operational_metrics};

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_load_rates_basic() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "rates.csv",
        "date,adr\n2025-06-01,120.5\n2025-06-02,135.0\n",
    );
    let rates = load_baseline_rates(dir.path());
    assert_eq!(rates.len(), 2);
    assert_eq!(rates["2025-06-01"], 120.5);
    assert_eq!(rates["2025-06-02"], 135.0);
}

#[test]
fn test_load_rates_case_insensitive_columns() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "rates.CSV",
        "Date, Published_Rate \n2025-06-01,99.0\n",
    );
    let rates = load_baseline_rates(dir.path());
    assert_eq!(rates["2025-06-01"], 99.0);
}

#[test]
fn test_load_rates_skips_bad_rows() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "rates.csv",
        "date,rate\nnot-a-date,100\n2025-06-01,-5\n2025-06-02,0\n2025-06-03,80\n",
    );
    let rates = load_baseline_rates(dir.path());
    assert_eq!(rates.len(), 1);
    assert_eq!(rates["2025-06-03"], 80.0);
}

#[test]
fn test_load_rates_dayfirst_dates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "rates.csv", "dt,arr\n15/06/2025,140\n");
    let rates = load_baseline_rates(dir.path());
    assert_eq!(rates["2025-06-15"], 140.0);
}

#[test]
fn test_load_rates_missing_dir() {
    let rates = load_baseline_rates(Path::new("/nonexistent/ratecast-test"));
    assert!(rates.is_empty());
}

#[test]
fn test_load_rates_no_recognizable_columns() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "other.csv", "foo,bar\n1,2\n");
    assert!(load_baseline_rates(dir.path()).is_empty());
}

#[test]
fn test_load_rates_ignores_non_tabular_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "notes.txt", "date,rate\n2025-06-01,100\n");
    assert!(load_baseline_rates(dir.path()).is_empty());
}

#[test]
fn test_later_file_overwrites_on_collision() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.csv", "date,rate\n2025-06-01,100\n");
    write_file(dir.path(), "b.csv", "date,rate\n2025-06-01,200\n");
    let rates = load_baseline_rates(dir.path());
    // One of the two wins; merge order across files is not guaranteed.
    assert_eq!(rates.len(), 1);
    let v = rates["2025-06-01"];
    assert!(v == 100.0 || v == 200.0);
}

#[test]
fn test_load_metrics_occupancy_and_pickup() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "ops.csv",
        "date,occupancy,pickup\n2025-06-01,0.85,4\n2025-06-02,92,0\n",
    );
    let metrics = load_operational_metrics(dir.path());
    assert_eq!(metrics["2025-06-01"].occupancy_pct, Some(0.85));
    assert_eq!(metrics["2025-06-01"].pickup_24h, Some(4.0));
    // 92 is a percentage, normalized to a fraction
    assert_eq!(metrics["2025-06-02"].occupancy_pct, Some(0.92));
    assert_eq!(metrics["2025-06-02"].pickup_24h, Some(0.0));
}

#[test]
fn test_load_metrics_partial_columns() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "occ.csv", "date,occ\n2025-06-01,0.4\n");
    let metrics = load_operational_metrics(dir.path());
    assert_eq!(metrics["2025-06-01"].occupancy_pct, Some(0.4));
    assert_eq!(metrics["2025-06-01"].pickup_24h, None);
}

#[test]
fn test_load_metrics_merges_across_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "occ.csv", "date,occ\n2025-06-01,0.4\n");
    write_file(dir.path(), "pickup.csv", "date,pickup_24h\n2025-06-01,7\n");
    let metrics = load_operational_metrics(dir.path());
    assert_eq!(metrics["2025-06-01"].occupancy_pct, Some(0.4));
    assert_eq!(metrics["2025-06-01"].pickup_24h, Some(7.0));
}

#[test]
fn test_resolve_columns_first_match_wins() {
    let headers = csv::StringRecord::from(vec!["Date", "rate", "price", "occ"]);
    let cols = resolve_columns(&headers);
    assert_eq!(cols.date, Some(0));
    assert_eq!(cols.rate, Some(1));
    assert_eq!(cols.occupancy, Some(3));
    assert_eq!(cols.pickup, None);
}

#[test]
fn test_parse_cell_date_formats() {
    assert!(parse_cell_date("2025-06-01").is_some());
    assert!(parse_cell_date("01/06/2025").is_some());
    assert!(parse_cell_date("garbage").is_none());
    // Ambiguous day/month resolves day-first
    let d = parse_cell_date("02/03/2025").unwrap();
    assert_eq!(d.to_string(), "2025-03-02");
}

#[test]
fn test_normalize_occupancy() {
    assert_eq!(normalize_occupancy(0.85), 0.85);
    assert_eq!(normalize_occupancy(1.5), 1.5);
    assert_eq!(normalize_occupancy(85.0), 0.85);
}
