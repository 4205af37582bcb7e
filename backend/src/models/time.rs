//! Timestamp and time-span parsing for raw stop records.
//!
//! Upstream spreadsheets are inconsistent about formats: timestamps arrive
//! with or without fractional seconds (or as bare dates), and durations
//! arrive as numeric seconds, pandas-style `"0 days 01:30:00"` spans, or
//! plain `"HH:MM:SS"` strings. Parsers here return `None` for anything
//! unusable; the normalizer decides what to do with the row.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Accepted timestamp formats, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a timestamp string, trying each known format.
///
/// Bare dates parse to midnight. Returns `None` for empty or unparsable
/// input instead of an error so the caller can treat the value as missing.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Primary time-span parser: numeric seconds or `[D days ]HH:MM:SS[.frac]`.
///
/// The clock portion is validated (minutes and seconds below 60); spans
/// that fail here may still parse through the looser [`parse_hms`]
/// fallback. Negative spans are rejected.
pub fn parse_timespan(raw: &str) -> Option<Duration> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(seconds) = trimmed.parse::<f64>() {
        return duration_from_seconds(seconds);
    }

    let (days, clock) = match trimmed.split_once(" day") {
        Some((day_part, rest)) => {
            let days = day_part.trim().parse::<i64>().ok()?;
            let clock = rest.trim_start_matches('s').trim();
            if clock.is_empty() {
                return duration_from_seconds(days as f64 * 86_400.0);
            }
            (days, clock)
        }
        None => (0, trimmed),
    };
    if days < 0 {
        return None;
    }

    let mut parts = clock.split(':');
    let hours = parts.next()?.trim().parse::<i64>().ok()?;
    let minutes = parts.next()?.trim().parse::<i64>().ok()?;
    let seconds = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if hours < 0 || !(0..60).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    duration_from_seconds(
        days as f64 * 86_400.0 + hours as f64 * 3_600.0 + minutes as f64 * 60.0 + seconds,
    )
}

/// Fallback time-span parser: exactly three `:`-separated integers.
///
/// Looser than [`parse_timespan`] in that minute/second fields may exceed
/// 59 (e.g. `"1:75:00"` is two hours fifteen minutes), matching how
/// operators sometimes key accumulated times.
pub fn parse_hms(raw: &str) -> Option<Duration> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours = parts[0].trim().parse::<i64>().ok()?;
    let minutes = parts[1].trim().parse::<i64>().ok()?;
    let seconds = parts[2].trim().parse::<i64>().ok()?;
    if hours < 0 || minutes < 0 || seconds < 0 {
        return None;
    }
    Some(Duration::seconds(hours * 3_600 + minutes * 60 + seconds))
}

/// Convert nonnegative seconds to a `Duration` with millisecond precision.
pub fn duration_from_seconds(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::milliseconds((seconds * 1_000.0).round() as i64))
}

/// Convert an hour count to a `Duration` with millisecond precision.
pub fn duration_from_hours(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Duration as fractional hours.
pub fn duration_hours(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 3_600_000.0
}

/// Render a duration as `"HH:MM:SS"` (hours are not wrapped at 24).
///
/// Negative durations render as `"00:00:00"`.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
