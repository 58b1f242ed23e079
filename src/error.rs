//! Error types for the pricing engine
//!
//! Only input errors (malformed dates, inverted ranges) are fatal to a
//! scoring call. Data-quality, external-search and model failures are
//! recovered close to where they occur and surface as log lines only.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date '{0}': expected ISO 8601 (YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Search provider error: {0}")]
    Search(String),

    #[error("Model error: {0}")]
    Model(String),
}
