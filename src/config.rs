//! Configuration loading
//!
//! Settings come from an optional TOML file plus `RATECAST_*` environment
//! overrides. The Perplexity API key may also arrive via `PERPLEXITY_API_KEY`
//! (loaded from `.env` at startup), which takes effect when the config file
//! leaves it empty.

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub perplexity: Option<PerplexityConfig>,
}

/// Directories and scoring defaults for the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    /// Weight of the ML prediction in the ensemble blend [0..1].
    #[serde(default = "default_ml_weight")]
    pub ml_weight: f64,
    /// Rolling median window for post-hoc smoothing (>= 1).
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    /// Cap on external search results per scoring call.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerplexityConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_perplexity_base_url")]
    pub base_url: String,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_out_dir() -> String {
    "output".to_string()
}

fn default_ml_weight() -> f64 {
    0.6
}

fn default_smoothing_window() -> usize {
    3
}

fn default_max_search_results() -> usize {
    8
}

fn default_perplexity_base_url() -> String {
    "https://api.perplexity.ai".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_dir: default_cache_dir(),
            out_dir: default_out_dir(),
            ml_weight: default_ml_weight(),
            smoothing_window: default_smoothing_window(),
            max_search_results: default_max_search_results(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file (optional) and environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("RATECAST").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
