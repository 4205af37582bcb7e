//! Data Transfer Objects for the HTTP API.
//!
//! The report and request types are re-exported from the core library;
//! they already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    AnalysisConfig, AnalysisReport, AnalysisRequest, AreaShare, CategoryBucket,
    CriticalStopRecord, CriticalSummary, Finding, KpiResult, MachineSummary, MonthlySummary,
    PeriodBucket, RankingEntry, RawStopRow, Severity,
};

/// Request body for the analyze endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// The analysis request proper: rows, filters, baseline.
    #[serde(flatten)]
    pub request: AnalysisRequest,
    /// Whether to consult the report cache (default: true)
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

fn default_true() -> bool {
    true
}

/// Response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of reports currently held by the cache.
    pub cached_reports: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_defaults_to_cached() {
        let body: AnalyzeRequest = serde_json::from_str(r#"{"rows": []}"#).unwrap();
        assert!(body.use_cache);
        assert!(body.request.rows.is_empty());
        assert!(body.request.machine.is_none());
    }

    #[test]
    fn test_analyze_request_flattens_filters() {
        let body: AnalyzeRequest = serde_json::from_str(
            r#"{"rows": [], "machine": "PET", "month": "2023-01", "use_cache": false}"#,
        )
        .unwrap();
        assert!(!body.use_cache);
        assert_eq!(body.request.machine.as_deref(), Some("PET"));
        assert_eq!(body.request.month.as_deref(), Some("2023-01"));
    }
}
