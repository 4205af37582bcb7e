//! Content-addressed memoization of analysis reports.
//!
//! Reports cache under the SHA-256 of the serialized request and
//! configuration, so any change to the input rows or the parameters
//! produces a different key. Invalidation is caller-controlled; nothing
//! is evicted implicitly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::AnalysisConfig;
use crate::error::EngineResult;
use crate::services::analysis::{run_analysis, AnalysisReport, AnalysisRequest};

/// Content hash identifying one (request, configuration) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash a request and the configuration it will run under.
    pub fn for_request(request: &AnalysisRequest, config: &AnalysisConfig) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_string(request).unwrap_or_default().as_bytes());
        hasher.update(serde_json::to_string(config).unwrap_or_default().as_bytes());
        CacheKey(hex::encode(hasher.finalize()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-process report cache.
#[derive(Default)]
pub struct AnalysisCache {
    entries: Mutex<HashMap<CacheKey, Arc<AnalysisReport>>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the analysis, reusing a cached report when the same request and
    /// configuration were seen before. Errors are not cached.
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        config: &AnalysisConfig,
    ) -> EngineResult<Arc<AnalysisReport>> {
        let key = CacheKey::for_request(request, config);
        if let Some(report) = self.get(&key) {
            debug!("analysis cache hit for {}", key);
            return Ok(report);
        }
        let report = run_analysis(request, config)?;
        Ok(self.insert(key, report))
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<AnalysisReport>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, report: AnalysisReport) -> Arc<AnalysisReport> {
        let report = Arc::new(report);
        self.entries.lock().insert(key, Arc::clone(&report));
        report
    }

    /// Drop one entry; returns whether it existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
