//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for the actual computation.

use axum::{extract::State, Json};
use tracing::info;

use super::dto::{AnalyzeRequest, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::config::AnalysisConfig;
use crate::services::analysis::{run_analysis, AnalysisReport};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        cached_reports: state.cache.len(),
    })
}

/// POST /v1/analyze
///
/// Run the full analysis pipeline over the rows in the request body.
/// Identical requests are served from the report cache unless the body
/// opts out with `use_cache: false`.
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> HandlerResult<AnalysisReport> {
    info!(
        rows = body.request.rows.len(),
        use_cache = body.use_cache,
        "analysis requested"
    );

    if body.use_cache {
        let report = state.cache.analyze(&body.request, &state.config)?;
        Ok(Json(report.as_ref().clone()))
    } else {
        Ok(Json(run_analysis(&body.request, &state.config)?))
    }
}

/// GET /v1/config
///
/// The effective analysis configuration.
pub async fn get_config(State(state): State<AppState>) -> Json<AnalysisConfig> {
    Json(state.config.as_ref().clone())
}
