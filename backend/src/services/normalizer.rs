//! Record normalization: raw spreadsheet rows into a validated dataset.
//!
//! Normalization is a pure function of the rows and the configuration.
//! Malformed rows are dropped and counted, never raised; the only error is
//! a required column missing from the input schema entirely.

use std::collections::HashMap;

use chrono::Duration;
use log::debug;
use serde_json::Value;

use crate::config::AnalysisConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::stop_event::{NormalizedDataset, RawStopRow, StopEvent};
use crate::models::time;

/// Normalize raw rows into a dataset of valid stop events.
///
/// Machine codes map through the configured table (unknown codes pass
/// through unchanged). Timestamps and durations parse tolerantly; a row
/// still missing `machine`, `start`, `end`, or a usable duration after
/// parsing is dropped and counted.
pub fn normalize(rows: &[RawStopRow], config: &AnalysisConfig) -> EngineResult<NormalizedDataset> {
    check_schema(rows)?;

    let mut events = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;
    for row in rows {
        match normalize_row(row, &config.machine_map) {
            Some(event) => events.push(event),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("normalization dropped {} of {} rows", dropped, rows.len());
    }
    Ok(NormalizedDataset::from_parts(events, dropped))
}

/// A required column must be present in at least one row.
///
/// `duration` is not checked on its own: it derives from `end - start`
/// when the column is missing, and those two are required anyway.
fn check_schema(rows: &[RawStopRow]) -> EngineResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    if !rows.iter().any(|row| row.machine.is_some()) {
        return Err(EngineError::MissingColumn { column: "machine" });
    }
    if !rows.iter().any(|row| row.start.is_some()) {
        return Err(EngineError::MissingColumn { column: "start" });
    }
    if !rows.iter().any(|row| row.end.is_some()) {
        return Err(EngineError::MissingColumn { column: "end" });
    }
    Ok(())
}

fn normalize_row(row: &RawStopRow, machine_map: &HashMap<String, String>) -> Option<StopEvent> {
    let machine_id = map_machine_code(row.machine.as_ref()?, machine_map)?;
    let start = time::parse_timestamp(row.start.as_deref()?)?;
    let end = time::parse_timestamp(row.end.as_deref()?)?;

    let duration = match row.duration.as_ref() {
        Some(value) => parse_duration_value(value)?,
        // No duration column: derive from the interval. A negative
        // interval (end before start) is malformed.
        None => {
            let span = end - start;
            if span < Duration::zero() {
                return None;
            }
            span
        }
    };

    let cause_label = row
        .cause
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let responsible_area = row
        .responsible_area
        .as_deref()
        .map(str::trim)
        .filter(|area| !area.is_empty())
        .map(str::to_string);

    Some(StopEvent::new(
        machine_id,
        start,
        end,
        duration,
        cause_label,
        responsible_area,
    ))
}

/// Map a raw machine value through the code table.
///
/// Numeric codes stringify without a decimal point; codes not in the table
/// pass through as-is (fails open).
fn map_machine_code(raw: &Value, machine_map: &HashMap<String, String>) -> Option<String> {
    let code = match raw {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.to_string()
        }
        Value::Number(number) => format_numeric_code(number)?,
        _ => return None,
    };
    Some(machine_map.get(&code).cloned().unwrap_or(code))
}

fn format_numeric_code(number: &serde_json::Number) -> Option<String> {
    if let Some(integer) = number.as_i64() {
        return Some(integer.to_string());
    }
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some((float as i64).to_string())
    } else {
        Some(float.to_string())
    }
}

/// Two-stage duration parse: primary span parse, then the `HH:MM:SS`
/// fallback. Numeric values are seconds.
fn parse_duration_value(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(number) => time::duration_from_seconds(number.as_f64()?),
        Value::String(text) => time::parse_timespan(text).or_else(|| time::parse_hms(text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(machine: Value, start: &str, end: &str, duration: &str) -> RawStopRow {
        RawStopRow {
            machine: Some(machine),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            duration: Some(Value::String(duration.to_string())),
            cause: Some("Electrical failure".to_string()),
            responsible_area: Some("Maintenance".to_string()),
        }
    }

    #[test]
    fn test_machine_code_mapping() {
        let config = AnalysisConfig::default();
        let rows = vec![
            row(json!(78), "2023-01-02 08:00:00", "2023-01-02 09:00:00", "01:00:00"),
            row(json!(999), "2023-01-02 10:00:00", "2023-01-02 11:00:00", "01:00:00"),
            row(json!("79"), "2023-01-02 12:00:00", "2023-01-02 13:00:00", "01:00:00"),
        ];
        let dataset = normalize(&rows, &config).unwrap();

        let machines: Vec<&str> = dataset
            .events()
            .iter()
            .map(|e| e.machine_id.as_str())
            .collect();
        assert_eq!(machines, vec!["PET", "999", "TETRA 1000"]);
    }

    #[test]
    fn test_rows_with_missing_essentials_are_dropped() {
        let config = AnalysisConfig::default();
        let mut bad_start = row(
            json!(78),
            "not a date",
            "2023-01-02 09:00:00",
            "01:00:00",
        );
        bad_start.cause = None;
        let rows = vec![
            row(json!(78), "2023-01-02 08:00:00", "2023-01-02 09:00:00", "01:00:00"),
            bad_start,
            row(json!(78), "2023-01-02 10:00:00", "2023-01-02 11:00:00", "garbage"),
            RawStopRow {
                machine: None,
                ..row(json!(78), "2023-01-02 12:00:00", "2023-01-02 13:00:00", "01:00:00")
            },
        ];
        let dataset = normalize(&rows, &config).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.dropped_rows(), 3);
    }

    #[test]
    fn test_duration_fallback_parse() {
        let config = AnalysisConfig::default();
        // 1:75:00 fails the primary parser and lands in the fallback.
        let rows = vec![row(
            json!(78),
            "2023-01-02 08:00:00",
            "2023-01-02 10:15:00",
            "1:75:00",
        )];
        let dataset = normalize(&rows, &config).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.events()[0].duration, Duration::minutes(135));
    }

    #[test]
    fn test_numeric_duration_is_seconds() {
        let config = AnalysisConfig::default();
        let mut with_numeric = row(json!(78), "2023-01-02 08:00:00", "2023-01-02 09:00:00", "");
        with_numeric.duration = Some(json!(5400));
        let dataset = normalize(&[with_numeric], &config).unwrap();
        assert_eq!(dataset.events()[0].duration, Duration::minutes(90));
    }

    #[test]
    fn test_missing_duration_column_derives_from_interval() {
        let config = AnalysisConfig::default();
        let mut derived = row(json!(78), "2023-01-02 08:00:00", "2023-01-02 09:30:00", "");
        derived.duration = None;
        let mut negative = row(json!(78), "2023-01-02 09:00:00", "2023-01-02 08:00:00", "");
        negative.duration = None;

        let dataset = normalize(&[derived, negative], &config).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.events()[0].duration, Duration::minutes(90));
        assert_eq!(dataset.dropped_rows(), 1);
    }

    #[test]
    fn test_missing_required_column_is_schema_error() {
        let config = AnalysisConfig::default();
        let rows = vec![RawStopRow {
            machine: Some(json!(78)),
            start: None,
            end: Some("2023-01-02 09:00:00".to_string()),
            duration: Some(json!("01:00:00")),
            cause: None,
            responsible_area: None,
        }];
        assert_eq!(
            normalize(&rows, &config),
            Err(EngineError::MissingColumn { column: "start" })
        );
    }

    #[test]
    fn test_empty_input_is_empty_dataset() {
        let config = AnalysisConfig::default();
        let dataset = normalize(&[], &config).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.dropped_rows(), 0);
    }

    #[test]
    fn test_partition_keys_derived() {
        let config = AnalysisConfig::default();
        let rows = vec![row(
            json!(78),
            "2023-01-02 14:30:00",
            "2023-01-02 15:00:00",
            "00:30:00",
        )];
        let dataset = normalize(&rows, &config).unwrap();
        let event = &dataset.events()[0];
        assert_eq!(event.year_month, "2023-01");
        assert_eq!(event.day_of_week, chrono::Weekday::Mon);
        assert_eq!(event.hour_of_day, 14);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let config = AnalysisConfig::default();
        let rows = vec![
            row(json!(78), "2023-01-02 08:00:00", "2023-01-02 09:00:00", "01:00:00"),
            row(json!(91), "2023-01-03 10:00:00", "2023-01-03 10:45:00", "00:45:00"),
        ];
        let first = normalize(&rows, &config).unwrap();

        // Re-feed the normalized events as rows; nothing further drops.
        let round_trip: Vec<RawStopRow> = first
            .events()
            .iter()
            .map(|e| RawStopRow {
                machine: Some(Value::String(e.machine_id.clone())),
                start: Some(e.start.format("%Y-%m-%d %H:%M:%S").to_string()),
                end: Some(e.end.format("%Y-%m-%d %H:%M:%S").to_string()),
                duration: Some(Value::String(crate::models::time::format_duration(
                    e.duration,
                ))),
                cause: Some(e.cause_label.clone()),
                responsible_area: e.responsible_area.clone(),
            })
            .collect();
        let second = normalize(&round_trip, &config).unwrap();

        assert_eq!(second.dropped_rows(), 0);
        assert_eq!(first.events(), second.events());
    }
}
