//! External search capability
//!
//! The events adapter only needs "text query in, titled results out", so the
//! provider sits behind a narrow trait. The production implementation talks
//! to the Perplexity search API; tests substitute a mock.

pub mod perplexity;

pub use perplexity::PerplexityClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One search result. Only the title participates in impact extraction;
/// the URL is kept for source citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// A bounded external search capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a text query, returning at most `max_results` hits.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
