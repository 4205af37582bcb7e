//! Public API surface for the analytics engine.
//!
//! This file consolidates the types a caller needs: the raw-row input,
//! the report value objects, and the engine errors. All DTO types derive
//! Serialize/Deserialize for JSON serialization.

pub use crate::config::AnalysisConfig;
pub use crate::error::{EngineError, EngineResult};
pub use crate::models::stop_event::{NormalizedDataset, RawStopRow, StopEvent};
pub use crate::services::aggregate::{CategoryBucket, CategoryField, PeriodBucket, PeriodField};
pub use crate::services::analysis::{
    AnalysisReport, AnalysisRequest, AreaShare, CriticalStopRecord, CriticalSummary,
    MachineSummary, MonthlySummary,
};
pub use crate::services::cache::{AnalysisCache, CacheKey};
pub use crate::services::kpi::KpiResult;
pub use crate::services::ranking::{CriticalStops, RankingEntry};
pub use crate::services::recommendations::{Finding, Severity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Moderate).unwrap(),
            "\"moderate\""
        );
    }

    #[test]
    fn test_raw_row_deserializes_from_sparse_json() {
        let row: RawStopRow =
            serde_json::from_str(r#"{"machine": 78, "start": "2023-01-02 08:00:00"}"#).unwrap();
        assert!(row.machine.is_some());
        assert!(row.end.is_none());
        assert!(row.responsible_area.is_none());
    }
}
