//! Engine error types.
//!
//! Row-level malformation (bad timestamps, unparsable durations, negative
//! spans) is never an error: such rows are dropped and counted during
//! normalization. The variants here cover the two fatal conditions.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal analysis errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A required column is entirely absent from the input schema.
    ///
    /// Fatal for the whole normalization call; there is nothing to retry.
    #[error("required column '{column}' is missing from the input")]
    MissingColumn { column: &'static str },

    /// The scheduled-time baseline is zero or negative.
    ///
    /// Fatal for KPI computation only; aggregation and ranking remain
    /// usable without a baseline.
    #[error("scheduled time baseline must be positive, got {hours} hours")]
    InvalidBaseline { hours: f64 },
}
