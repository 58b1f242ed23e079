//! Baseline rate and operational-metric ingestion
//!
//! Scans a data directory for tabular files and extracts per-date published
//! rates plus optional occupancy/pickup metrics. Malformed rows and
//! unreadable files are skipped, never fatal: an empty mapping is a valid
//! answer. Later files overwrite earlier ones on date collision; merge order
//! follows directory iteration order, which callers must not rely on.

pub mod columns;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::DailyMetrics;
use crate::utils::to_iso;
use columns::{normalize_occupancy, parse_cell_date, parse_cell_f64, resolve_columns};

/// Tabular files in the directory, matched by case-insensitive extension.
pub(crate) fn tabular_files(data_dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect()
}

/// Load per-date published rates (ADR) from the data directory.
///
/// Returns a mapping `YYYY-MM-DD -> rate` with only positive rates kept.
pub fn load_baseline_rates(data_dir: &Path) -> BTreeMap<String, f64> {
    let mut mapping = BTreeMap::new();
    for path in tabular_files(data_dir) {
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Skipping unreadable data file {:?}: {}", path, e);
                continue;
            }
        };
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let cols = match reader.headers() {
            Ok(headers) => resolve_columns(headers),
            Err(e) => {
                warn!("Skipping data file with bad header {:?}: {}", path, e);
                continue;
            }
        };
        let (date_idx, rate_idx) = match (cols.date, cols.rate) {
            (Some(d), Some(r)) => (d, r),
            _ => {
                debug!("No date/rate columns in {:?}", path);
                continue;
            }
        };
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(_) => continue,
            };
            let date = record.get(date_idx).and_then(parse_cell_date);
            let rate = record.get(rate_idx).and_then(parse_cell_f64);
            if let (Some(d), Some(r)) = (date, rate) {
                if r > 0.0 {
                    mapping.insert(to_iso(d), r);
                }
            }
        }
    }
    mapping
}

/// Load optional per-date operational metrics (occupancy and 24h pickup).
pub fn load_operational_metrics(data_dir: &Path) -> BTreeMap<String, DailyMetrics> {
    let mut metrics: BTreeMap<String, DailyMetrics> = BTreeMap::new();
    for path in tabular_files(data_dir) {
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Skipping unreadable data file {:?}: {}", path, e);
                continue;
            }
        };
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let cols = match reader.headers() {
            Ok(headers) => resolve_columns(headers),
            Err(_) => continue,
        };
        let date_idx = match cols.date {
            Some(d) => d,
            None => continue,
        };
        if cols.occupancy.is_none() && cols.pickup.is_none() {
            continue;
        }
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(_) => continue,
            };
            let date = match record.get(date_idx).and_then(parse_cell_date) {
                Some(d) => d,
                None => continue,
            };
            let occ = cols
                .occupancy
                .and_then(|i| record.get(i))
                .and_then(parse_cell_f64)
                .map(normalize_occupancy);
            let pick = cols.pickup.and_then(|i| record.get(i)).and_then(parse_cell_f64);
            if occ.is_none() && pick.is_none() {
                continue;
            }
            let entry = metrics.entry(to_iso(date)).or_default();
            if occ.is_some() {
                entry.occupancy_pct = occ;
            }
            if pick.is_some() {
                entry.pickup_24h = pick;
            }
        }
    }
    metrics
}
