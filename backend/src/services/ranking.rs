//! Cause rankings and critical-stop classification.

use serde::{Deserialize, Serialize};

use crate::models::stop_event::{NormalizedDataset, StopEvent};
use crate::services::aggregate::{aggregate_by_category, CategoryField};

/// One ranked category with its accumulated downtime and occurrence count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub label: String,
    pub total_hours: qtty::Hours,
    pub count: usize,
}

/// The critical subset of a dataset and its share of all stops.
#[derive(Debug, Clone)]
pub struct CriticalStops {
    pub events: Vec<StopEvent>,
    pub percent: f64,
}

/// Top `n` categories by accumulated stop duration (Pareto ranking).
///
/// Ties break by label ascending: aggregation emits labels in ascending
/// order and the sort is stable.
pub fn top_by_duration(
    dataset: &NormalizedDataset,
    field: CategoryField,
    n: usize,
) -> Vec<RankingEntry> {
    let mut entries = ranking_entries(dataset, field);
    entries.sort_by(|a, b| {
        b.total_hours
            .value()
            .partial_cmp(&a.total_hours.value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(n);
    entries
}

/// Top `n` categories by occurrence count, ties broken by label ascending.
pub fn top_by_frequency(
    dataset: &NormalizedDataset,
    field: CategoryField,
    n: usize,
) -> Vec<RankingEntry> {
    let mut entries = ranking_entries(dataset, field);
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

fn ranking_entries(dataset: &NormalizedDataset, field: CategoryField) -> Vec<RankingEntry> {
    aggregate_by_category(dataset, field)
        .into_iter()
        .map(|bucket| RankingEntry {
            label: bucket.label,
            total_hours: bucket.total_hours,
            count: bucket.count,
        })
        .collect()
}

/// Split out stops whose duration strictly exceeds `threshold_hours`.
///
/// A stop exactly at the threshold is not critical. The percentage is
/// zero for an empty dataset.
pub fn classify_critical(dataset: &NormalizedDataset, threshold_hours: f64) -> CriticalStops {
    let threshold_ms = (threshold_hours * 3_600_000.0).round() as i64;
    let events: Vec<StopEvent> = dataset
        .events()
        .iter()
        .filter(|event| event.duration.num_milliseconds() > threshold_ms)
        .cloned()
        .collect();
    let percent = if dataset.is_empty() {
        0.0
    } else {
        events.len() as f64 / dataset.len() as f64 * 100.0
    };
    CriticalStops { events, percent }
}
