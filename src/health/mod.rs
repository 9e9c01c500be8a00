//! Analytics health scoring.
//!
//! A health check runs four independent checks against the property, scores
//! each from 0 to 100 and rolls them up into a [`HealthReport`].
//!
//! ## Submodules
//!
//! - [`checks`]: the four checks and their scoring rules
//! - [`alert`]: email alerts for degraded health
//! - [`command`]: the `health` command (single run and continuous loop)

pub mod alert;
pub mod checks;
pub mod command;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::data::round_to;
use checks::{AttributionDetails, CoreTrackingDetails, FunnelDetails, RealtimeDetails};

/// Score boundaries between health states.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Lowest score still considered healthy.
    pub healthy: f64,
    /// Lowest score still considered a warning.
    pub warning: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            healthy: 80.0,
            warning: 50.0,
        }
    }
}

impl Thresholds {
    pub fn status_for(&self, score: f64) -> HealthStatus {
        if score >= self.healthy {
            HealthStatus::Healthy
        } else if score >= self.warning {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }
}

/// Health status of a check or of the whole property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Status for a score using the default thresholds.
    pub fn from_score(score: f64) -> Self {
        Thresholds::default().status_for(score)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "🟢",
            HealthStatus::Warning => "🟡",
            HealthStatus::Critical => "🔴",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Critical => "CRITICAL",
        }
    }
}

/// A detected problem and the points it costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Penalty {
    pub points: u32,
    pub issue: String,
}

impl Penalty {
    pub fn new(points: u32, issue: impl Into<String>) -> Self {
        Self {
            points,
            issue: issue.into(),
        }
    }
}

/// `base` minus the sum of penalties, clamped to `[0, 100]`.
pub fn score_with_penalties(base: u32, penalties: &[Penalty]) -> u32 {
    let lost: u32 = penalties.iter().map(|p| p.points).sum();
    base.min(100).saturating_sub(lost)
}

/// Outcome of one health check.
///
/// `details` is absent when the check could not fetch its data; `error`
/// then says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult<D> {
    pub status: HealthStatus,
    pub health_score: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: Option<D>,
}

impl<D> CheckResult<D> {
    /// A scored check with data.
    pub fn scored(base: u32, penalties: Vec<Penalty>, details: D) -> Self {
        let health_score = score_with_penalties(base, &penalties);
        let issues = penalties.into_iter().map(|p| p.issue).collect();
        Self::with_score(health_score, issues, details)
    }

    /// A check whose deductions are reported through `details` only.
    pub fn with_score(health_score: u32, issues: Vec<String>, details: D) -> Self {
        let health_score = health_score.min(100);
        Self {
            status: HealthStatus::from_score(f64::from(health_score)),
            health_score,
            issues,
            error: None,
            details: Some(details),
        }
    }

    /// A check that could not run.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Critical,
            health_score: 0,
            issues: Vec::new(),
            error: Some(error.into()),
            details: None,
        }
    }
}

/// Results of all four checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthChecks {
    pub core_tracking: CheckResult<CoreTrackingDetails>,
    pub conversion_funnel: CheckResult<FunnelDetails>,
    pub realtime_tracking: CheckResult<RealtimeDetails>,
    pub partner_attribution: CheckResult<AttributionDetails>,
}

impl HealthChecks {
    /// `(name, status, score, issues, error)` for each check, in report order.
    fn summaries(&self) -> [(&'static str, HealthStatus, u32, &[String], Option<&str>); 4] {
        [
            summary("core_tracking", &self.core_tracking),
            summary("conversion_funnel", &self.conversion_funnel),
            summary("realtime_tracking", &self.realtime_tracking),
            summary("partner_attribution", &self.partner_attribution),
        ]
    }
}

fn summary<'a, D>(
    name: &'static str,
    check: &'a CheckResult<D>,
) -> (&'static str, HealthStatus, u32, &'a [String], Option<&'a str>) {
    (
        name,
        check.status,
        check.health_score,
        &check.issues,
        check.error.as_deref(),
    )
}

/// The rolled-up result of a health check run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Local>,
    pub overall_status: HealthStatus,
    pub overall_score: f64,
    pub status_emoji: String,
    pub checks: HealthChecks,
    pub critical_issues: Vec<String>,
    pub warning_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl HealthReport {
    /// Combine check results. The overall score is the mean of the check
    /// scores rounded to one decimal.
    pub fn from_checks(checks: HealthChecks, timestamp: DateTime<Local>) -> Self {
        let summaries = checks.summaries();

        let total: u32 = summaries.iter().map(|s| s.2).sum();
        let overall_score = round_to(f64::from(total) / summaries.len() as f64, 1);
        let overall_status = HealthStatus::from_score(overall_score);

        let mut critical_issues = Vec::new();
        let mut warning_issues = Vec::new();
        for (name, status, _, issues, error) in summaries {
            match status {
                HealthStatus::Critical => critical_issues.push(format!(
                    "{}: {}",
                    name,
                    error.unwrap_or("Critical issue")
                )),
                HealthStatus::Warning => warning_issues.extend(issues.iter().cloned()),
                HealthStatus::Healthy => {}
            }
        }

        let recommendations = recommendations(&checks);

        Self {
            timestamp,
            overall_status,
            overall_score,
            status_emoji: overall_status.emoji().to_string(),
            checks,
            critical_issues,
            warning_issues,
            recommendations,
        }
    }
}

/// Actionable follow-ups. Rules only fire for checks that returned data.
pub fn recommendations(checks: &HealthChecks) -> Vec<String> {
    let mut recommendations = Vec::new();

    if checks.core_tracking.status == HealthStatus::Critical {
        recommendations.push("❗ Fix core event tracking - check GA4 implementation".to_string());
    }
    if let Some(core) = &checks.core_tracking.details {
        if !core.missing_events.is_empty() {
            recommendations.push(format!(
                "🔧 Implement missing events: {}",
                core.missing_events.join(", ")
            ));
        }
    }

    if let Some(funnel) = &checks.conversion_funnel.details {
        if funnel.conversion_rate < 2.0 {
            recommendations.push("📈 Optimize deal pages to improve conversion rate".to_string());
        }
        if funnel.click_rate < 10.0 {
            recommendations.push("🎯 Improve deal card design to increase click rate".to_string());
        }
    }

    if let Some(realtime) = &checks.realtime_tracking.details {
        if realtime.active_users == 0 {
            recommendations.push("📢 Drive traffic to the site for testing".to_string());
        }
    }

    if let Some(attribution) = &checks.partner_attribution.details {
        if attribution.total_attributed_events < 10 {
            recommendations.push("🔗 Verify UTM parameter implementation".to_string());
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EventCounts, Tally};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    #[test]
    fn test_status_boundaries() {
        assert_eq!(HealthStatus::from_score(100.0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_score(80.0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_score(79.0), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_score(79.9), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_score(50.0), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_score(49.0), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_score(0.0), HealthStatus::Critical);
    }

    #[test]
    fn test_status_ordering() {
        assert!(HealthStatus::Healthy < HealthStatus::Warning);
        assert!(HealthStatus::Warning < HealthStatus::Critical);
    }

    #[test]
    fn test_penalties_are_subtracted_and_clamped() {
        assert_eq!(score_with_penalties(100, &[]), 100);
        assert_eq!(
            score_with_penalties(100, &[Penalty::new(20, "a"), Penalty::new(30, "b")]),
            50
        );
        assert_eq!(
            score_with_penalties(
                100,
                &[
                    Penalty::new(40, "a"),
                    Penalty::new(30, "b"),
                    Penalty::new(40, "c")
                ]
            ),
            0
        );
        assert_eq!(score_with_penalties(150, &[Penalty::new(10, "a")]), 90);
    }

    fn healthy_checks() -> HealthChecks {
        HealthChecks {
            core_tracking: CheckResult::scored(
                100,
                vec![],
                CoreTrackingDetails {
                    total_events: 500,
                    found_events: EventCounts::new(),
                    missing_events: vec![],
                    required_events: vec![],
                },
            ),
            conversion_funnel: CheckResult::scored(
                100,
                vec![],
                FunnelDetails {
                    funnel_data: BTreeMap::new(),
                    click_rate: 20.0,
                    conversion_rate: 5.0,
                },
            ),
            realtime_tracking: CheckResult::scored(
                100,
                vec![],
                RealtimeDetails {
                    active_users: 4,
                    total_events: 30,
                },
            ),
            partner_attribution: CheckResult::scored(
                100,
                vec![],
                AttributionDetails {
                    partners: Tally::new(),
                    utm_tracking: Tally::new(),
                    total_attributed_events: 50,
                },
            ),
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_report_all_healthy() {
        let report = HealthReport::from_checks(healthy_checks(), at());
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert_eq!(report.status_emoji, "🟢");
        assert!(report.critical_issues.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_missing_events_stay_out_of_issue_lists() {
        let mut checks = healthy_checks();
        let found: EventCounts = [("page_view", 10u64), ("view_item", 4), ("select_item", 2)]
            .into_iter()
            .collect();
        checks.core_tracking = checks::score_core_tracking(found);

        let report = HealthReport::from_checks(checks, at());

        // (60 + 100 + 100 + 100) / 4
        assert_eq!(report.overall_score, 90.0);
        assert!(report.warning_issues.is_empty());
        assert!(report.critical_issues.is_empty());
        assert_eq!(
            report.recommendations,
            vec!["🔧 Implement missing events: click_external_deal, conversion".to_string()]
        );
    }

    #[test]
    fn test_report_mean_and_issue_lists() {
        let mut checks = healthy_checks();
        checks.conversion_funnel = CheckResult::scored(
            100,
            vec![Penalty::new(30, "Low click rate: 5.0%")],
            FunnelDetails {
                funnel_data: BTreeMap::new(),
                click_rate: 5.0,
                conversion_rate: 5.0,
            },
        );
        checks.partner_attribution = CheckResult::failed("Failed to check attribution health: boom");

        let report = HealthReport::from_checks(checks, at());

        // (100 + 70 + 100 + 0) / 4
        assert_eq!(report.overall_score, 67.5);
        assert_eq!(report.overall_status, HealthStatus::Warning);
        assert_eq!(
            report.critical_issues,
            vec!["partner_attribution: Failed to check attribution health: boom".to_string()]
        );
        assert_eq!(report.warning_issues, vec!["Low click rate: 5.0%".to_string()]);
        assert_eq!(
            report.recommendations,
            vec!["🎯 Improve deal card design to increase click rate".to_string()]
        );
    }

    #[test]
    fn test_failed_core_check_recommends_fix_only() {
        let mut checks = healthy_checks();
        checks.core_tracking = CheckResult::failed("Failed to check core tracking: timeout");

        let report = HealthReport::from_checks(checks, at());
        assert_eq!(
            report.recommendations,
            vec!["❗ Fix core event tracking - check GA4 implementation".to_string()]
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report = HealthReport::from_checks(healthy_checks(), at());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["overall_status"], "healthy");
        assert_eq!(value["checks"]["realtime_tracking"]["active_users"], 4);
        assert_eq!(value["checks"]["realtime_tracking"]["health_score"], 100);
        assert!(value["checks"]["core_tracking"].get("error").is_none());
    }
}
