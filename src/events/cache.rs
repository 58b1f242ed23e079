//! On-disk cache for event-impact lookups
//!
//! One JSON file per distinct query, named by a digest of the normalized
//! request parameters. Reads fail soft: a missing or corrupt entry is a
//! cache miss. Concurrent writers to the same key race last-write-wins,
//! which is acceptable because entries are idempotent recomputations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::types::SourceRef;

/// Cached result of one event-impact query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub daily: BTreeMap<String, f64>,
    pub sources: Vec<SourceRef>,
}

#[derive(Serialize)]
struct CacheKeyParams<'a> {
    location: &'a str,
    start: &'a str,
    end: &'a str,
    max_results: usize,
}

/// File-backed cache under a single directory.
pub struct ImpactCache {
    dir: PathBuf,
}

impl ImpactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Deterministic digest of the normalized request parameters.
    pub fn cache_key(location: &str, start: &str, end: &str, max_results: usize) -> String {
        let params = CacheKeyParams {
            location,
            start,
            end,
            max_results,
        };
        let payload = serde_json::to_vec(&params).expect("cache key params serialize");
        hex::encode(Sha256::digest(payload))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn read(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entry) => {
                    debug!("Impact cache hit: {:?}", path);
                    Some(entry)
                }
                Err(e) => {
                    warn!("Discarding corrupt impact cache entry {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read impact cache entry {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn write(&self, key: &str, entry: &CacheEntry) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!("Failed to create cache dir {:?}: {}", self.dir, e);
            return;
        }
        let path = self.entry_path(key);
        match serde_json::to_vec_pretty(entry) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&path, bytes) {
                    warn!("Failed to write impact cache entry {:?}: {}", path, e);
                }
            }
            Err(e) => warn!("Failed to serialize impact cache entry: {}", e),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
