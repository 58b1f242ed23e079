//! Date-range pricing orchestrator
//!
//! Composes the baseline loader, event-impact adapter, heuristic pricer and
//! regression model into one scored sequence per request. Baseline data and
//! event impacts are fetched once per call, not once per date. The model is
//! supplied explicitly at construction; replacing it means building a new
//! engine value, never patching a loaded model in place.


use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::baseline;
use crate::client::SearchProvider;
use crate::error::{EngineError, Result};
use crate::events::EventImpactAdapter;
use crate::heuristics::{compute_price_for_date, PriceInputs};
use crate::ml::{build_features_for_date, PriceModel};
use crate::types::{PricingItem, PricingRequest, RunMetadata, SourceRef};
use crate::utils::{daterange, round2, to_iso};

/// Knobs for one scoring run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Skip the external events search (cache still applies)
    pub disable_external: bool,
    /// Cap on external search results
    pub max_search_results: usize,
    /// Ignore the impact cache and query fresh
    pub force_refresh: bool,
    /// Skip ML blending even when a model is loaded
    pub disable_ml: bool,
    /// Weight of the ML prediction in the ensemble blend [0..1]
    pub ml_weight: f64,
    /// Rolling median window for smoothing (>= 1; 1 disables)
    pub smoothing_window: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            disable_external: false,
            max_search_results: 8,
            force_refresh: false,
            disable_ml: false,
            ml_weight: 0.6,
            smoothing_window: 3,
        }
    }
}

/// The pricing engine. Single-threaded and sequential per call.
pub struct PricingEngine {
    data_dir: PathBuf,
    adapter: EventImpactAdapter,
    model: Option<PriceModel>,
}

impl PricingEngine {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        provider: Option<Box<dyn SearchProvider>>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            adapter: EventImpactAdapter::new(cache_dir, provider),
            model: None,
        }
    }

    /// Attach a trained model. Reload means constructing a replacement.
    pub fn with_model(mut self, model: Option<PriceModel>) -> Self {
        self.model = model;
        self
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Score every date in the request's inclusive range.
    ///
    /// Fatal only on malformed dates or an inverted range; every other
    /// failure degrades to weaker signals.
    pub async fn score_dates(
        &self,
        request: &PricingRequest,
        options: &EngineOptions,
    ) -> Result<(Vec<PricingItem>, RunMetadata)> {
        let start = parse_iso_date(&request.from_date)?;
        let end = parse_iso_date(&request.to_date)?;
        if end < start {
            return Err(EngineError::InvalidDateRange {
                from: request.from_date.clone(),
                to: request.to_date.clone(),
            });
        }

        let baseline = baseline::load_baseline_rates(&self.data_dir);
        let metrics = baseline::load_operational_metrics(&self.data_dir);
        debug!(
            "Loaded {} baseline days and {} metric days from {:?}",
            baseline.len(),
            metrics.len(),
            self.data_dir
        );

        let (impacts, sources): (BTreeMap<String, f64>, Vec<SourceRef>) =
            match &request.location {
                Some(location) => {
                    self.adapter
                        .fetch_event_impacts(
                            location,
                            start,
                            end,
                            options.max_search_results,
                            options.disable_external,
                            options.force_refresh,
                        )
                        .await
                }
                None => (BTreeMap::new(), Vec::new()),
            };

        let model = if options.disable_ml {
            None
        } else {
            self.model.as_ref()
        };

        let mut items: Vec<PricingItem> = Vec::new();
        for date in daterange(start, end) {
            let iso = to_iso(date);
            let published_rate = baseline.get(&iso).copied();
            let event_impact = impacts.get(&iso).copied().unwrap_or(0.0);
            let (occupancy_pct, pickup_24h) = metrics
                .get(&iso)
                .map(|m| (m.occupancy_pct, m.pickup_24h))
                .unwrap_or((None, None));

            let heur = compute_price_for_date(
                date,
                &PriceInputs {
                    published_rate,
                    occupancy_pct,
                    pickup_24h,
                    event_impact: Some(event_impact),
                },
            );
            let mut price_rec = heur.price_rec;
            let mut drivers = heur.drivers.clone();

            // ML inference and ensemble blend. The heuristic price stands
            // in for the published rate when no baseline exists.
            if let Some(model) = model {
                let features = build_features_for_date(
                    date,
                    Some(published_rate.unwrap_or(heur.price_rec)),
                    occupancy_pct,
                    pickup_24h,
                    Some(event_impact),
                );
                match model.predict_price(&features) {
                    Ok(ml_price) => {
                        price_rec = round2(
                            options.ml_weight * ml_price
                                + (1.0 - options.ml_weight) * heur.price_rec,
                        );
                        drivers.push("ML model".to_string());
                    }
                    Err(e) => {
                        debug!("ML prediction failed for {}, keeping heuristic price: {}", iso, e);
                    }
                }
            }

            // Guardrails from the unblended heuristic band, slightly expanded
            let guard_min = (heur.price_min * 0.9).max(0.0);
            let guard_max = heur.price_max * 1.1;
            if price_rec < guard_min {
                price_rec = round2(guard_min);
                drivers.push("Guardrail min".to_string());
            } else if price_rec > guard_max {
                price_rec = round2(guard_max);
                drivers.push("Guardrail max".to_string());
            }

            let price_min = round2((price_rec - 20.0).max(0.0));
            let price_max = round2(price_rec + 20.0);

            items.push(PricingItem {
                date: iso,
                room_type_code: request.room_type_code.clone(),
                price_rec,
                price_min,
                price_max,
                drivers,
            });
        }

        apply_rolling_median(&mut items, options.smoothing_window);

        let meta = RunMetadata {
            hotel_id: request.hotel_id,
            room_type_code: request.room_type_code.clone(),
            from: request.from_date.clone(),
            to: request.to_date.clone(),
            location: request.location.clone(),
            num_items: items.len(),
            baseline_days: baseline.len(),
            metrics_days: metrics.len(),
            sources,
            events_disabled: options.disable_external,
            max_search_results: options.max_search_results,
            ml_loaded: model.is_some(),
            ml_weight: options.ml_weight,
            smoothing_window: options.smoothing_window,
        };
        info!(
            "Scored {} days for hotel {} room {}",
            meta.num_items, meta.hotel_id, meta.room_type_code
        );
        Ok((items, meta))
    }
}

fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate(s.to_string()))
}

/// Rolling-median smoothing over the scored sequence.
///
/// Each index blends its current price with the median of its centered
/// window (narrower at the edges, no wraparound). The pass reads prices as
/// they stand at each step, so an earlier adjustment can influence later
/// windows; that ordering is part of the contract. Even-length edge windows
/// take the lower-middle element of the sorted values.
fn apply_rolling_median(items: &mut [PricingItem], window: usize) {
    if window <= 1 || items.len() < window {
        return;
    }
    let half = window / 2;
    for i in 0..items.len() {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(items.len());
        let mut values: Vec<f64> = items[lo..hi].iter().map(|item| item.price_rec).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let median = values[(values.len() - 1) / 2];
        let blended = round2(0.5 * items[i].price_rec + 0.5 * median);
        if (blended - items[i].price_rec).abs() >= 0.01 {
            items[i].price_rec = blended;
            items[i].price_min = round2((blended - 20.0).max(0.0));
            items[i].price_max = round2(blended + 20.0);
            items[i].drivers.push("Smoothing".to_string());
        }
    }
}
