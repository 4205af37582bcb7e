//! One-shot analysis orchestration: request in, report out.
//!
//! The caller builds an immutable [`AnalysisRequest`]; the engine returns
//! a self-contained [`AnalysisReport`]. No state persists between calls.

use chrono::Duration;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::EngineResult;
use crate::models::stop_event::{NormalizedDataset, RawStopRow};
use crate::models::time::{duration_from_hours, duration_hours, format_duration};
use crate::services::aggregate::{
    aggregate_by_category, aggregate_by_period, CategoryBucket, CategoryField, PeriodBucket,
    PeriodField,
};
use crate::services::kpi::{compute_kpis, KpiResult};
use crate::services::normalizer::normalize;
use crate::services::ranking::{classify_critical, top_by_duration, top_by_frequency, RankingEntry};
use crate::services::recommendations::{recommend, synthesize, Finding};

/// Immutable description of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub rows: Vec<RawStopRow>,
    /// Restrict to one machine (post-mapping name); `None` analyzes all.
    #[serde(default)]
    pub machine: Option<String>,
    /// Restrict to one `"YYYY-MM"` period; `None` analyzes the full window.
    #[serde(default)]
    pub month: Option<String>,
    /// Explicit scheduled-time baseline in hours. When absent the baseline
    /// derives as `scheduled_hours_per_day x distinct calendar days` in
    /// the filtered window.
    #[serde(default)]
    pub scheduled_hours: Option<f64>,
}

/// Per-machine roll-up of stop counts and durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSummary {
    pub machine: String,
    pub count: usize,
    pub total_hours: qtty::Hours,
    pub mean_hours: qtty::Hours,
}

/// Per-month roll-up, chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year_month: String,
    pub count: usize,
    pub total_hours: qtty::Hours,
    pub mean_hours: qtty::Hours,
}

/// One responsible area's slice of the stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaShare {
    pub area: String,
    pub count: usize,
    pub total_hours: qtty::Hours,
    /// Share of stop occurrences, in percent.
    pub percent_of_stops: f64,
    /// Share of accumulated downtime, in percent.
    pub percent_of_downtime: f64,
}

/// One critical stop, flattened for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalStopRecord {
    pub machine: String,
    pub cause: String,
    pub responsible_area: Option<String>,
    pub start: String,
    /// `"HH:MM:SS"` rendering of the stop duration.
    pub duration: String,
    pub duration_hours: qtty::Hours,
}

/// Critical-stop drill-down for the analyzed window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalSummary {
    pub percent: f64,
    pub count: usize,
    /// Top critical causes by accumulated duration.
    pub top_causes: Vec<RankingEntry>,
    /// Critical stops grouped by responsible area.
    pub by_area: Vec<CategoryBucket>,
    /// Individual critical stops, longest first.
    pub stops: Vec<CriticalStopRecord>,
}

/// Complete analysis output for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Valid events in the analyzed (filtered) window.
    pub record_count: usize,
    /// Malformed rows dropped during normalization.
    pub dropped_rows: usize,
    /// Baseline actually used; `None` when the window was empty and no
    /// explicit baseline was supplied ("no data to show").
    pub scheduled_hours: Option<qtty::Hours>,
    pub kpi: Option<KpiResult>,
    pub area_shares: Vec<AreaShare>,
    /// Top causes by accumulated duration (Pareto).
    pub pareto_causes: Vec<RankingEntry>,
    /// Top causes by occurrence count.
    pub frequent_causes: Vec<RankingEntry>,
    pub monthly_occurrences: Vec<PeriodBucket>,
    pub day_of_week_profile: Vec<PeriodBucket>,
    pub hour_of_day_profile: Vec<PeriodBucket>,
    pub machine_summary: Vec<MachineSummary>,
    pub monthly_summary: Vec<MonthlySummary>,
    pub critical: CriticalSummary,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

/// Run the full analysis pipeline for one request.
pub fn run_analysis(
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> EngineResult<AnalysisReport> {
    let dataset = normalize(&request.rows, config)?;
    let dataset = apply_filters(&dataset, request);
    debug!(
        "analyzing {} events (machine={:?}, month={:?})",
        dataset.len(),
        request.machine,
        request.month
    );

    let scheduled = scheduled_baseline(&dataset, request, config);
    let kpi = match scheduled {
        Some(time) => Some(compute_kpis(&dataset, time)?),
        None => None,
    };

    let area_buckets = aggregate_by_category(&dataset, CategoryField::ResponsibleArea);
    let pareto_causes = top_by_duration(&dataset, CategoryField::Cause, config.top_n);
    let frequent_causes = top_by_frequency(&dataset, CategoryField::Cause, config.top_n);
    let monthly_occurrences = aggregate_by_period(&dataset, PeriodField::YearMonth);
    let critical = critical_summary(&dataset, config);

    let findings = match &kpi {
        Some(kpi) => synthesize(
            kpi,
            critical.percent,
            &area_buckets,
            &pareto_causes,
            &frequent_causes,
            &monthly_occurrences,
        ),
        None => Vec::new(),
    };
    let recommendations = if dataset.is_empty() {
        Vec::new()
    } else {
        recommend(
            dominant_area_label(&area_buckets),
            pareto_causes.first().map(|e| e.label.as_str()),
            frequent_causes.first().map(|e| e.label.as_str()),
        )
    };

    Ok(AnalysisReport {
        record_count: dataset.len(),
        dropped_rows: dataset.dropped_rows(),
        scheduled_hours: scheduled.map(|d| qtty::Hours::new(duration_hours(d))),
        kpi,
        area_shares: area_shares(&dataset, area_buckets),
        pareto_causes,
        frequent_causes,
        monthly_occurrences,
        day_of_week_profile: aggregate_by_period(&dataset, PeriodField::DayOfWeek),
        hour_of_day_profile: aggregate_by_period(&dataset, PeriodField::HourOfDay),
        machine_summary: machine_summary(&dataset),
        monthly_summary: monthly_summary(&dataset),
        critical,
        findings,
        recommendations,
    })
}

fn apply_filters(dataset: &NormalizedDataset, request: &AnalysisRequest) -> NormalizedDataset {
    dataset.filtered(|event| {
        request
            .machine
            .as_deref()
            .map_or(true, |machine| event.machine_id == machine)
            && request
                .month
                .as_deref()
                .map_or(true, |month| event.year_month == month)
    })
}

/// Baseline selection: explicit hours win (even nonpositive ones, which
/// fail in KPI computation); otherwise derive from distinct calendar days.
fn scheduled_baseline(
    dataset: &NormalizedDataset,
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Option<Duration> {
    if let Some(hours) = request.scheduled_hours {
        return Some(duration_from_hours(hours));
    }
    let days = dataset.distinct_start_days();
    if days == 0 {
        return None;
    }
    Some(duration_from_hours(
        days as f64 * config.scheduled_hours_per_day,
    ))
}

fn area_shares(dataset: &NormalizedDataset, buckets: Vec<CategoryBucket>) -> Vec<AreaShare> {
    let total_hours: f64 = buckets.iter().map(|b| b.total_hours.value()).sum();
    let total_stops = dataset.len();
    buckets
        .into_iter()
        .map(|bucket| AreaShare {
            percent_of_stops: if total_stops > 0 {
                bucket.count as f64 / total_stops as f64 * 100.0
            } else {
                0.0
            },
            percent_of_downtime: if total_hours > 0.0 {
                bucket.total_hours.value() / total_hours * 100.0
            } else {
                0.0
            },
            area: bucket.label,
            count: bucket.count,
            total_hours: bucket.total_hours,
        })
        .collect()
}

fn dominant_area_label(buckets: &[CategoryBucket]) -> Option<&str> {
    buckets
        .iter()
        .max_by(|a, b| {
            a.total_hours
                .value()
                .partial_cmp(&b.total_hours.value())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|bucket| bucket.label.as_str())
}

fn critical_summary(dataset: &NormalizedDataset, config: &AnalysisConfig) -> CriticalSummary {
    let critical = classify_critical(dataset, config.critical_threshold_hours);
    let critical_dataset = NormalizedDataset::from_parts(critical.events, 0);

    let mut stops: Vec<CriticalStopRecord> = critical_dataset
        .events()
        .iter()
        .map(|event| CriticalStopRecord {
            machine: event.machine_id.clone(),
            cause: event.cause_label.clone(),
            responsible_area: event.responsible_area.clone(),
            start: event.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration: format_duration(event.duration),
            duration_hours: qtty::Hours::new(event.duration_hours()),
        })
        .collect();
    stops.sort_by(|a, b| {
        b.duration_hours
            .value()
            .partial_cmp(&a.duration_hours.value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    CriticalSummary {
        percent: critical.percent,
        count: critical_dataset.len(),
        top_causes: top_by_duration(&critical_dataset, CategoryField::Cause, config.top_n),
        by_area: aggregate_by_category(&critical_dataset, CategoryField::ResponsibleArea),
        stops,
    }
}

fn machine_summary(dataset: &NormalizedDataset) -> Vec<MachineSummary> {
    aggregate_by_category(dataset, CategoryField::Machine)
        .into_iter()
        .map(|bucket| MachineSummary {
            mean_hours: qtty::Hours::new(bucket.total_hours.value() / bucket.count as f64),
            machine: bucket.label,
            count: bucket.count,
            total_hours: bucket.total_hours,
        })
        .collect()
}

fn monthly_summary(dataset: &NormalizedDataset) -> Vec<MonthlySummary> {
    aggregate_by_period(dataset, PeriodField::YearMonth)
        .into_iter()
        .map(|bucket| MonthlySummary {
            mean_hours: qtty::Hours::new(bucket.total_hours.value() / bucket.count as f64),
            year_month: bucket.period,
            count: bucket.count,
            total_hours: bucket.total_hours,
        })
        .collect()
}
