//! Model lifecycle: training, persistence, loading, inference
//!
//! The artifact is a JSON document (scaler + trees + feature order) with a
//! metadata sidecar. Loading fails soft: missing or corrupt files mean "no
//! model", which the orchestrator treats as ML disabled for the run.

use std::fs::File;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::baseline::columns::{
    normalize_occupancy, parse_cell_date, parse_cell_f64, resolve_columns,
};
use crate::baseline::tabular_files;
use crate::error::{EngineError, Result};

use super::gbrt::{GbrtParams, GradientBoostedTrees, StandardScaler};
use super::{build_features_for_date, FEATURE_ORDER};

pub const MODEL_FILENAME: &str = "pricing_model.json";
pub const MODEL_META_FILENAME: &str = "pricing_model.meta.json";

const MODEL_VERSION: &str = "gbrt-v1";
const SPLIT_SEED: u64 = 42;

/// Metadata sidecar describing a persisted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    pub feature_order: Vec<String>,
    pub version: String,
    pub mae_val: Option<f64>,
    pub n_samples: usize,
}

/// A trained pricing model: scaler + boosted trees + feature contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceModel {
    scaler: StandardScaler,
    booster: GradientBoostedTrees,
    feature_order: Vec<String>,
    version: String,
    mae_val: Option<f64>,
    n_samples: usize,
}

impl PriceModel {
    /// Predict a price from a feature vector aligned to the model's
    /// feature order.
    pub fn predict_price(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.feature_order.len() {
            return Err(EngineError::Model(format!(
                "feature vector has {} fields, model expects {}",
                features.len(),
                self.feature_order.len()
            )));
        }
        let scaled = self.scaler.transform_row(features);
        Ok(self.booster.predict(&scaled))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn validation_mae(&self) -> Option<f64> {
        self.mae_val
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Persist the artifact and its metadata sidecar.
    pub fn save(&self, cache_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(cache_dir)?;
        let artifact = File::create(cache_dir.join(MODEL_FILENAME))?;
        serde_json::to_writer(artifact, self)?;
        let meta = ModelMeta {
            feature_order: self.feature_order.clone(),
            version: self.version.clone(),
            mae_val: self.mae_val,
            n_samples: self.n_samples,
        };
        let sidecar = File::create(cache_dir.join(MODEL_META_FILENAME))?;
        serde_json::to_writer_pretty(sidecar, &meta)?;
        Ok(())
    }

    /// Load a persisted model. Missing or corrupt artifacts yield None,
    /// never an error.
    pub fn load(cache_dir: &Path) -> Option<PriceModel> {
        let artifact_path = cache_dir.join(MODEL_FILENAME);
        let meta_path = cache_dir.join(MODEL_META_FILENAME);
        if !artifact_path.exists() || !meta_path.exists() {
            return None;
        }
        let model: PriceModel = match File::open(&artifact_path).map_err(EngineError::from).and_then(|f| {
            serde_json::from_reader(f).map_err(EngineError::from)
        }) {
            Ok(model) => model,
            Err(e) => {
                warn!("Treating unreadable model artifact as absent: {}", e);
                return None;
            }
        };
        let meta: ModelMeta = match File::open(&meta_path).map_err(EngineError::from).and_then(|f| {
            serde_json::from_reader(f).map_err(EngineError::from)
        }) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Treating unreadable model metadata as absent: {}", e);
                return None;
            }
        };
        if meta.feature_order != model.feature_order {
            warn!("Model metadata disagrees with artifact feature order, ignoring model");
            return None;
        }
        debug!("Loaded pricing model {} ({} samples)", model.version, model.n_samples);
        Some(model)
    }

    /// Train from tabular files in `data_dir` and persist into `cache_dir`.
    ///
    /// Returns None when no usable training rows exist. The historical rate
    /// column serves as both the published-rate feature and the regression
    /// target; at inference time the model predicts a price the same way.
    pub fn train_from_data_dir(data_dir: &Path, cache_dir: &Path) -> Option<PriceModel> {
        let (rows, targets) = collect_training_rows(data_dir);
        if rows.is_empty() {
            warn!("No usable training rows found in {:?}", data_dir);
            return None;
        }

        let n = rows.len();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
        indices.shuffle(&mut rng);
        let n_val = if n >= 5 { n / 5 } else { 0 };
        let (val_idx, train_idx) = indices.split_at(n_val);

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

        let scaler = StandardScaler::fit(&x_train);
        let x_scaled = scaler.transform(&x_train);
        let booster = GradientBoostedTrees::fit(GbrtParams::default(), &x_scaled, &y_train);

        let mae_val = if val_idx.is_empty() {
            None
        } else {
            let abs_err: f64 = val_idx
                .iter()
                .map(|&i| {
                    let pred = booster.predict(&scaler.transform_row(&rows[i]));
                    (pred - targets[i]).abs()
                })
                .sum();
            Some(abs_err / val_idx.len() as f64)
        };

        let model = PriceModel {
            scaler,
            booster,
            feature_order: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            version: MODEL_VERSION.to_string(),
            mae_val,
            n_samples: n,
        };

        info!(
            "Trained pricing model {} on {} samples (validation MAE {:?})",
            model.version, n, mae_val
        );
        if let Err(e) = model.save(cache_dir) {
            warn!("Failed to persist trained model: {}", e);
        }
        Some(model)
    }
}

/// Scan the data directory and build one feature/target pair per valid row.
/// Uses the same file and column semantics as the baseline loader.
fn collect_training_rows(data_dir: &Path) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rows = Vec::new();
    let mut targets = Vec::new();

    for path in tabular_files(data_dir) {
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Skipping unreadable training file {:?}: {}", path, e);
                continue;
            }
        };
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let cols = match reader.headers() {
            Ok(headers) => resolve_columns(headers),
            Err(_) => continue,
        };
        let (date_idx, target_idx) = match (cols.date, cols.rate) {
            (Some(d), Some(t)) => (d, t),
            _ => continue,
        };
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(_) => continue,
            };
            let date = match record.get(date_idx).and_then(parse_cell_date) {
                Some(d) => d,
                None => continue,
            };
            let target = match record.get(target_idx).and_then(parse_cell_f64) {
                Some(t) if t > 0.0 => t,
                _ => continue,
            };
            let occ = cols
                .occupancy
                .and_then(|i| record.get(i))
                .and_then(parse_cell_f64)
                .map(normalize_occupancy);
            let pick = cols.pickup.and_then(|i| record.get(i)).and_then(parse_cell_f64);
            // historical rate stands in for the published-rate feature;
            // historical event impact is unknown
            let features = build_features_for_date(date, Some(target), occ, pick, Some(0.0));
            rows.push(features);
            targets.push(target);
        }
    }

    (rows, targets)
}
