//! Core downtime KPIs: availability, efficiency, MTBF, MTTR.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::stop_event::NormalizedDataset;
use crate::models::time::duration_hours;

/// KPI snapshot for one analysis window.
///
/// Derived and read-only: recomputed on every query, never updated
/// incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiResult {
    /// Share of scheduled time not spent stopped, clamped to [0, 100].
    pub availability: f64,
    /// Operational efficiency percentage. Every variant of the source
    /// computes this with the same formula as availability; the
    /// duplication is kept as observed (a known ambiguity) instead of
    /// substituting a quality/performance factor.
    pub efficiency: f64,
    /// Mean uptime per stop event, zero when there are fewer than two
    /// stops. This is uptime divided by stop count, not textbook MTBF.
    pub mtbf_hours: qtty::Hours,
    /// Mean stop duration in hours, zero for an empty window.
    pub mttr_hours: qtty::Hours,
    pub mean_stop_hours: qtty::Hours,
    pub total_stop_hours: qtty::Hours,
    pub stop_count: usize,
}

/// Compute the KPI snapshot against a scheduled-time baseline.
///
/// Total downtime exceeding the baseline is a legitimate data condition
/// (an underestimated baseline), absorbed by the clamp; a nonpositive
/// baseline is a configuration error.
pub fn compute_kpis(
    dataset: &NormalizedDataset,
    scheduled_time: Duration,
) -> EngineResult<KpiResult> {
    let scheduled_hours = duration_hours(scheduled_time);
    if scheduled_hours <= 0.0 {
        return Err(EngineError::InvalidBaseline {
            hours: scheduled_hours,
        });
    }

    let total_hours = duration_hours(dataset.total_duration());
    let count = dataset.len();

    let availability =
        ((scheduled_hours - total_hours) / scheduled_hours * 100.0).clamp(0.0, 100.0);
    let efficiency = availability;

    let mean_stop_hours = if count > 0 {
        total_hours / count as f64
    } else {
        0.0
    };
    let mtbf_hours = if count > 1 {
        (scheduled_hours - total_hours) / count as f64
    } else {
        0.0
    };

    Ok(KpiResult {
        availability,
        efficiency,
        mtbf_hours: qtty::Hours::new(mtbf_hours),
        mttr_hours: qtty::Hours::new(mean_stop_hours),
        mean_stop_hours: qtty::Hours::new(mean_stop_hours),
        total_stop_hours: qtty::Hours::new(total_hours),
        stop_count: count,
    })
}
