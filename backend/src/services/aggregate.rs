//! Aggregation of stop events by category and by time period.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::models::stop_event::{NormalizedDataset, StopEvent};
use crate::models::time::duration_hours;

/// Canonical Monday-first labels for day-of-week buckets.
const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Categorical grouping dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Machine,
    Cause,
    ResponsibleArea,
}

impl CategoryField {
    /// Grouping key for one event; `None` means the event does not carry
    /// this dimension and is skipped.
    fn key<'a>(&self, event: &'a StopEvent) -> Option<&'a str> {
        match self {
            CategoryField::Machine => Some(event.machine_id.as_str()),
            CategoryField::Cause => {
                Some(event.cause_label.as_str()).filter(|label| !label.is_empty())
            }
            CategoryField::ResponsibleArea => event
                .responsible_area
                .as_deref()
                .filter(|area| !area.is_empty()),
        }
    }
}

/// Time-period grouping dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodField {
    YearMonth,
    DayOfWeek,
    HourOfDay,
}

/// Total stop time and occurrence count for one category value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub label: String,
    pub total_hours: qtty::Hours,
    pub count: usize,
}

/// Total stop time and occurrence count for one period bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub period: String,
    pub total_hours: qtty::Hours,
    pub count: usize,
}

/// Group events by a categorical dimension.
///
/// Buckets come back ordered by label ascending. A dimension carried by no
/// event at all (e.g. a source without responsible areas) yields an empty
/// vec, never an error.
pub fn aggregate_by_category(
    dataset: &NormalizedDataset,
    field: CategoryField,
) -> Vec<CategoryBucket> {
    let mut groups: BTreeMap<String, (Duration, usize)> = BTreeMap::new();
    for event in dataset.events() {
        if let Some(key) = field.key(event) {
            let entry = groups
                .entry(key.to_string())
                .or_insert((Duration::zero(), 0));
            entry.0 = entry.0 + event.duration;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(label, (total, count))| CategoryBucket {
            label,
            total_hours: qtty::Hours::new(duration_hours(total)),
            count,
        })
        .collect()
}

/// Group events by a time period.
///
/// Ordering is canonical per period kind: year-month buckets sort
/// lexicographically (chronological for `"YYYY-MM"`), day-of-week buckets
/// Monday through Sunday, hour buckets numerically 0-23.
pub fn aggregate_by_period(dataset: &NormalizedDataset, period: PeriodField) -> Vec<PeriodBucket> {
    match period {
        PeriodField::YearMonth => {
            let mut groups: BTreeMap<String, (Duration, usize)> = BTreeMap::new();
            for event in dataset.events() {
                accumulate(groups.entry(event.year_month.clone()), event);
            }
            groups
                .into_iter()
                .map(|(period, totals)| bucket(period, totals))
                .collect()
        }
        PeriodField::DayOfWeek => {
            let mut groups: BTreeMap<u32, (Duration, usize)> = BTreeMap::new();
            for event in dataset.events() {
                accumulate(
                    groups.entry(event.day_of_week.num_days_from_monday()),
                    event,
                );
            }
            groups
                .into_iter()
                .map(|(day, totals)| bucket(WEEKDAY_LABELS[day as usize].to_string(), totals))
                .collect()
        }
        PeriodField::HourOfDay => {
            let mut groups: BTreeMap<u32, (Duration, usize)> = BTreeMap::new();
            for event in dataset.events() {
                accumulate(groups.entry(event.hour_of_day), event);
            }
            groups
                .into_iter()
                .map(|(hour, totals)| bucket(format!("{:02}", hour), totals))
                .collect()
        }
    }
}

fn accumulate<K: Ord>(
    entry: std::collections::btree_map::Entry<'_, K, (Duration, usize)>,
    event: &StopEvent,
) {
    let totals = entry.or_insert((Duration::zero(), 0));
    totals.0 = totals.0 + event.duration;
    totals.1 += 1;
}

fn bucket(period: String, (total, count): (Duration, usize)) -> PeriodBucket {
    PeriodBucket {
        period,
        total_hours: qtty::Hours::new(duration_hours(total)),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(date: (i32, u32, u32), hour: u32, minutes: i64, area: Option<&str>) -> StopEvent {
        let start = NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        StopEvent::new(
            "PET".to_string(),
            start,
            start + Duration::minutes(minutes),
            Duration::minutes(minutes),
            "Jam".to_string(),
            area.map(str::to_string),
        )
    }

    fn dataset(events: Vec<StopEvent>) -> NormalizedDataset {
        NormalizedDataset::from_parts(events, 0)
    }

    #[test]
    fn test_category_totals_and_label_order() {
        let data = dataset(vec![
            event((2023, 1, 2), 8, 60, Some("Production")),
            event((2023, 1, 3), 9, 30, Some("Maintenance")),
            event((2023, 1, 4), 10, 30, Some("Maintenance")),
        ]);
        let buckets = aggregate_by_category(&data, CategoryField::ResponsibleArea);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Maintenance");
        assert_eq!(buckets[0].count, 2);
        assert!((buckets[0].total_hours.value() - 1.0).abs() < 1e-9);
        assert_eq!(buckets[1].label, "Production");
    }

    #[test]
    fn test_absent_dimension_yields_empty() {
        let data = dataset(vec![
            event((2023, 1, 2), 8, 60, None),
            event((2023, 1, 3), 9, 30, None),
        ]);
        assert!(aggregate_by_category(&data, CategoryField::ResponsibleArea).is_empty());
    }

    #[test]
    fn test_year_month_chronological() {
        let data = dataset(vec![
            event((2023, 11, 2), 8, 30, None),
            event((2023, 2, 5), 9, 30, None),
            event((2024, 1, 9), 9, 30, None),
            event((2023, 2, 20), 10, 30, None),
        ]);
        let buckets = aggregate_by_period(&data, PeriodField::YearMonth);

        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-02", "2023-11", "2024-01"]);
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn test_day_of_week_monday_first() {
        // Sunday, Wednesday, Monday starts; output order must not be
        // alphabetical or insertion order.
        let data = dataset(vec![
            event((2023, 1, 8), 8, 30, None),
            event((2023, 1, 4), 9, 30, None),
            event((2023, 1, 2), 10, 30, None),
        ]);
        let buckets = aggregate_by_period(&data, PeriodField::DayOfWeek);

        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["Monday", "Wednesday", "Sunday"]);
    }

    #[test]
    fn test_hour_of_day_numeric_order() {
        let data = dataset(vec![
            event((2023, 1, 2), 22, 30, None),
            event((2023, 1, 2), 3, 30, None),
            event((2023, 1, 2), 14, 30, None),
        ]);
        let buckets = aggregate_by_period(&data, PeriodField::HourOfDay);

        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["03", "14", "22"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let data = dataset(vec![
            event((2023, 1, 2), 8, 60, Some("Production")),
            event((2023, 1, 3), 9, 30, Some("Maintenance")),
        ]);
        let first = aggregate_by_category(&data, CategoryField::ResponsibleArea);
        let second = aggregate_by_category(&data, CategoryField::ResponsibleArea);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.label, b.label);
            assert_eq!(a.count, b.count);
            assert_eq!(a.total_hours.value(), b.total_hours.value());
        }
        // The dataset itself is untouched.
        assert_eq!(data.len(), 2);
    }
}
