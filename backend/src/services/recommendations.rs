//! Templated findings and action recommendations.
//!
//! Pure threshold-to-template selection: the same KPI and ranking inputs
//! always produce the same findings, in the same order.

use serde::{Deserialize, Serialize};

use crate::services::aggregate::{CategoryBucket, PeriodBucket};
use crate::services::kpi::KpiResult;
use crate::services::ranking::RankingEntry;

/// Share of total downtime above which a single responsible area is
/// flagged as dominant.
const DOMINANT_AREA_PERCENT: f64 = 40.0;

/// Qualitative rating attached to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Low,
    Moderate,
    High,
}

/// One templated conclusion about the analyzed window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(code: &str, severity: Severity, message: String) -> Self {
        Self {
            code: code.to_string(),
            severity,
            message,
        }
    }
}

/// Map KPI values and rankings to severity-tagged findings.
pub fn synthesize(
    kpi: &KpiResult,
    critical_percent: f64,
    area_shares: &[CategoryBucket],
    top_causes_by_duration: &[RankingEntry],
    top_causes_by_frequency: &[RankingEntry],
    monthly_occurrences: &[PeriodBucket],
) -> Vec<Finding> {
    let mut findings = vec![
        availability_finding(kpi),
        critical_finding(critical_percent),
    ];
    if let Some(finding) = dominant_area_finding(area_shares) {
        findings.push(finding);
    }
    if let Some(entry) = top_causes_by_duration.first() {
        findings.push(Finding::new(
            "top_cause_duration",
            Severity::Moderate,
            format!(
                "'{}' has the largest downtime impact: {:.1}h across {} stops",
                entry.label,
                entry.total_hours.value(),
                entry.count
            ),
        ));
    }
    if let Some(entry) = top_causes_by_frequency.first() {
        findings.push(Finding::new(
            "top_cause_frequency",
            Severity::Moderate,
            format!(
                "'{}' is the most frequent stop cause with {} occurrences",
                entry.label, entry.count
            ),
        ));
    }
    if let Some(finding) = trend_finding(monthly_occurrences) {
        findings.push(finding);
    }
    findings
}

fn availability_finding(kpi: &KpiResult) -> Finding {
    let (severity, qualifier) = if kpi.availability < 70.0 {
        (Severity::Low, "low")
    } else if kpi.availability < 85.0 {
        (Severity::Moderate, "moderate")
    } else {
        (Severity::Good, "good")
    };
    Finding::new(
        "availability",
        severity,
        format!(
            "Availability is {} at {:.2}% (operational efficiency {:.2}%)",
            qualifier, kpi.availability, kpi.efficiency
        ),
    )
}

fn critical_finding(critical_percent: f64) -> Finding {
    let severity = if critical_percent > 20.0 {
        Severity::High
    } else if critical_percent > 10.0 {
        Severity::Moderate
    } else {
        Severity::Low
    };
    Finding::new(
        "critical_stops",
        severity,
        format!(
            "{:.2}% of stops exceed the critical duration threshold",
            critical_percent
        ),
    )
}

/// Flag a single area holding more than [`DOMINANT_AREA_PERCENT`] of the
/// total downtime.
fn dominant_area_finding(area_shares: &[CategoryBucket]) -> Option<Finding> {
    let total: f64 = area_shares.iter().map(|a| a.total_hours.value()).sum();
    if total <= 0.0 {
        return None;
    }
    let top = area_shares.iter().max_by(|a, b| {
        a.total_hours
            .value()
            .partial_cmp(&b.total_hours.value())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    let share = top.total_hours.value() / total * 100.0;
    if share > DOMINANT_AREA_PERCENT {
        Some(Finding::new(
            "dominant_area",
            Severity::High,
            format!(
                "Area '{}' accounts for {:.1}% of total downtime",
                top.label, share
            ),
        ))
    } else {
        None
    }
}

/// Compare the first and last monthly occurrence counts across at least
/// three periods.
fn trend_finding(monthly_occurrences: &[PeriodBucket]) -> Option<Finding> {
    if monthly_occurrences.len() < 3 {
        return None;
    }
    let first = monthly_occurrences.first()?;
    let last = monthly_occurrences.last()?;
    if last.count > first.count {
        Some(Finding::new(
            "trend",
            Severity::High,
            format!(
                "Deteriorating trend: stops per month rose from {} ({}) to {} ({})",
                first.count, first.period, last.count, last.period
            ),
        ))
    } else if last.count < first.count {
        Some(Finding::new(
            "trend",
            Severity::Good,
            format!(
                "Improving trend: stops per month fell from {} ({}) to {} ({})",
                first.count, first.period, last.count, last.period
            ),
        ))
    } else {
        None
    }
}

/// Templated action recommendations for the standout area and causes.
pub fn recommend(
    dominant_area: Option<&str>,
    top_duration_cause: Option<&str>,
    top_frequency_cause: Option<&str>,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if let Some(area) = dominant_area {
        recommendations.push(format!(
            "Focus an action plan on the '{}' area to reduce total downtime",
            area
        ));
    }
    if let Some(cause) = top_duration_cause {
        recommendations.push(format!(
            "Investigate the root cause of '{}' stops to mitigate their impact",
            cause
        ));
    }
    if let Some(cause) = top_frequency_cause {
        recommendations.push(format!(
            "Develop targeted training to reduce the frequency of '{}' stops",
            cause
        ));
    }
    recommendations.push(
        "Set availability and efficiency targets and review the indicators periodically"
            .to_string(),
    );
    recommendations.push(
        "Run preventive maintenance focused on the components behind the critical stops"
            .to_string(),
    );
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(availability: f64) -> KpiResult {
        KpiResult {
            availability,
            efficiency: availability,
            mtbf_hours: qtty::Hours::new(0.0),
            mttr_hours: qtty::Hours::new(0.0),
            mean_stop_hours: qtty::Hours::new(0.0),
            total_stop_hours: qtty::Hours::new(0.0),
            stop_count: 0,
        }
    }

    fn area(label: &str, hours: f64) -> CategoryBucket {
        CategoryBucket {
            label: label.to_string(),
            total_hours: qtty::Hours::new(hours),
            count: 1,
        }
    }

    fn month(period: &str, count: usize) -> PeriodBucket {
        PeriodBucket {
            period: period.to_string(),
            total_hours: qtty::Hours::new(count as f64),
            count,
        }
    }

    #[test]
    fn test_availability_thresholds() {
        assert_eq!(availability_finding(&kpi(69.99)).severity, Severity::Low);
        assert_eq!(availability_finding(&kpi(70.0)).severity, Severity::Moderate);
        assert_eq!(availability_finding(&kpi(84.99)).severity, Severity::Moderate);
        assert_eq!(availability_finding(&kpi(85.0)).severity, Severity::Good);
        assert_eq!(availability_finding(&kpi(100.0)).severity, Severity::Good);
    }

    #[test]
    fn test_critical_thresholds() {
        assert_eq!(critical_finding(25.0).severity, Severity::High);
        assert_eq!(critical_finding(20.0).severity, Severity::Moderate);
        assert_eq!(critical_finding(10.0).severity, Severity::Low);
        assert_eq!(critical_finding(0.0).severity, Severity::Low);
    }

    #[test]
    fn test_dominant_area_strictly_above_forty_percent() {
        // 50/50 split: no dominance.
        let even = vec![area("Maintenance", 5.0), area("Production", 5.0)];
        assert!(dominant_area_finding(&even).is_none());

        let skewed = vec![area("Maintenance", 9.0), area("Production", 1.0)];
        let finding = dominant_area_finding(&skewed).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert!(finding.message.contains("Maintenance"));
        assert!(finding.message.contains("90.0%"));
    }

    #[test]
    fn test_dominant_area_empty_input() {
        assert!(dominant_area_finding(&[]).is_none());
    }

    #[test]
    fn test_trend_requires_three_periods() {
        let two = vec![month("2023-01", 1), month("2023-02", 5)];
        assert!(trend_finding(&two).is_none());

        let rising = vec![month("2023-01", 1), month("2023-02", 3), month("2023-03", 5)];
        let finding = trend_finding(&rising).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert!(finding.message.contains("Deteriorating"));

        let falling = vec![month("2023-01", 5), month("2023-02", 3), month("2023-03", 1)];
        let finding = trend_finding(&falling).unwrap();
        assert_eq!(finding.severity, Severity::Good);

        let flat = vec![month("2023-01", 3), month("2023-02", 9), month("2023-03", 3)];
        assert!(trend_finding(&flat).is_none());
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let k = kpi(62.0);
        let areas = vec![area("Maintenance", 9.0), area("Production", 1.0)];
        let causes = vec![RankingEntry {
            label: "Jam".to_string(),
            total_hours: qtty::Hours::new(4.0),
            count: 7,
        }];
        let months = vec![month("2023-01", 1), month("2023-02", 2), month("2023-03", 4)];

        let first = synthesize(&k, 30.0, &areas, &causes, &causes, &months);
        let second = synthesize(&k, 30.0, &areas, &causes, &causes, &months);

        assert_eq!(first.len(), 6);
        assert_eq!(first[0].code, "availability");
        assert_eq!(first[0].severity, Severity::Low);
        assert_eq!(first[1].code, "critical_stops");
        assert_eq!(first[1].severity, Severity::High);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.code, b.code);
            assert_eq!(a.message, b.message);
        }
    }

    #[test]
    fn test_recommend_templates() {
        let recs = recommend(Some("Maintenance"), Some("Belt failure"), Some("Jam"));
        assert_eq!(recs.len(), 5);
        assert!(recs[0].contains("Maintenance"));
        assert!(recs[1].contains("Belt failure"));
        assert!(recs[2].contains("Jam"));

        // Without standouts only the generic recommendations remain.
        assert_eq!(recommend(None, None, None).len(), 2);
    }
}
