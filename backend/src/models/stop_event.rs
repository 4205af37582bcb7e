//! Domain records for machine stop events.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::time::duration_hours;

/// One raw spreadsheet row, as supplied by the ingestion layer.
///
/// Every field is optional and loosely typed: `machine` may be a numeric
/// code or a name, `duration` may be a span string or numeric seconds.
/// A required *column* counts as absent from the schema only when no row
/// in the whole input carries it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStopRow {
    #[serde(default)]
    pub machine: Option<Value>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub responsible_area: Option<String>,
}

/// A validated stop event with its partition keys.
///
/// Partition keys (`year` through `hour_of_day`) are derived from `start`
/// once at normalization time and reused by every downstream consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct StopEvent {
    pub machine_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Always nonnegative; rows violating this are dropped upstream.
    pub duration: Duration,
    /// Empty when the source row carried no cause description.
    pub cause_label: String,
    pub responsible_area: Option<String>,
    pub year: i32,
    pub month: u32,
    /// `"YYYY-MM"`, so lexicographic order is chronological order.
    pub year_month: String,
    pub day_of_week: Weekday,
    pub hour_of_day: u32,
}

impl StopEvent {
    /// Build an event, deriving the partition keys from `start`.
    pub fn new(
        machine_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        duration: Duration,
        cause_label: String,
        responsible_area: Option<String>,
    ) -> Self {
        Self {
            year: start.year(),
            month: start.month(),
            year_month: format!("{:04}-{:02}", start.year(), start.month()),
            day_of_week: start.weekday(),
            hour_of_day: start.hour(),
            machine_id,
            start,
            end,
            duration,
            cause_label,
            responsible_area,
        }
    }

    /// Stop duration as fractional hours.
    pub fn duration_hours(&self) -> f64 {
        duration_hours(self.duration)
    }
}

/// An ordered, validated collection of stop events.
///
/// Immutable after normalization: consumers read events through
/// accessors and derive new datasets via [`NormalizedDataset::filtered`]
/// instead of mutating in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedDataset {
    events: Vec<StopEvent>,
    dropped_rows: usize,
}

impl NormalizedDataset {
    pub(crate) fn from_parts(events: Vec<StopEvent>, dropped_rows: usize) -> Self {
        Self {
            events,
            dropped_rows,
        }
    }

    pub fn events(&self) -> &[StopEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Malformed rows recovered (dropped) during normalization.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Sum of all stop durations.
    pub fn total_duration(&self) -> Duration {
        self.events
            .iter()
            .fold(Duration::zero(), |acc, event| acc + event.duration)
    }

    /// Number of distinct calendar days covered by start timestamps.
    pub fn distinct_start_days(&self) -> usize {
        self.events
            .iter()
            .map(|event| event.start.date())
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }

    /// A new dataset holding the events matching `keep`.
    ///
    /// The dropped-row count carries over: it describes the normalization
    /// pass, not the filter.
    pub fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&StopEvent) -> bool,
    {
        Self {
            events: self.events.iter().filter(|e| keep(e)).cloned().collect(),
            dropped_rows: self.dropped_rows,
        }
    }
}
