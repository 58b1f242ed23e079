//! Perplexity search API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::PerplexityConfig;
use crate::error::{EngineError, Result};

use super::{SearchHit, SearchProvider};

/// HTTP client for the Perplexity `/search` endpoint.
#[derive(Clone)]
pub struct PerplexityClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    title: Option<String>,
    url: Option<String>,
}

impl PerplexityClient {
    /// Create a new client. Fails if the API key is missing.
    pub fn new(config: &PerplexityConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(EngineError::Search("Perplexity API key not configured".to_string()));
        }
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for PerplexityClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url);
        debug!("Perplexity search: {}", query);
        let resp: SearchResponse = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                title: r.title.unwrap_or_default(),
                url: r.url.unwrap_or_default(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "perplexity"
    }
}
