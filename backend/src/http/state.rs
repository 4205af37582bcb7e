//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::services::cache::AnalysisCache;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Analysis policy applied to every request
    pub config: Arc<AnalysisConfig>,
    /// Content-hash cache of finished reports
    pub cache: Arc<AnalysisCache>,
}

impl AppState {
    /// Create a new application state with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(AnalysisCache::new()),
        }
    }
}
