//! The four health checks.
//!
//! Each check fetches one report and hands the rows to a pure scoring
//! function. A failed fetch becomes a critical result with a score of zero
//! rather than an error, so one broken report never hides the others.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ga4_types::{DateRange, MinuteRange, Row, RunRealtimeReportRequest, RunReportRequest};

use super::{CheckResult, HealthChecks, Penalty};
use crate::data::{is_set, round_to, EventCounts, EventStats, Funnel, Tally};
use crate::source::ReportSource;

/// Events that must appear in the last day.
pub const REQUIRED_EVENTS: [&str; 5] = [
    "page_view",
    "view_item",
    "select_item",
    "click_external_deal",
    "conversion",
];

const FUNNEL_EVENTS: [&str; 3] = ["view_item", "select_item", "click_external_deal"];

/// Window for the realtime check, the longest GA4 allows on standard properties.
pub const REALTIME_WINDOW_MINUTES: u32 = 29;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreTrackingDetails {
    pub total_events: u64,
    pub found_events: EventCounts,
    pub missing_events: Vec<String>,
    pub required_events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelDetails {
    pub funnel_data: BTreeMap<String, EventStats>,
    pub click_rate: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeDetails {
    pub active_users: u64,
    pub total_events: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionDetails {
    pub partners: Tally,
    pub utm_tracking: Tally,
    pub total_attributed_events: u64,
}

/// Score the last day's event counts: 20 points per missing required event.
/// Missing events are listed in the details and the recommendations, not as
/// issues.
pub fn score_core_tracking(found: EventCounts) -> CheckResult<CoreTrackingDetails> {
    let missing: Vec<String> = found
        .missing(&REQUIRED_EVENTS)
        .into_iter()
        .map(String::from)
        .collect();

    let lost = (missing.len() as u32).saturating_mul(20);

    CheckResult::with_score(
        100u32.saturating_sub(lost),
        Vec::new(),
        CoreTrackingDetails {
            total_events: found.total(),
            found_events: found,
            missing_events: missing,
            required_events: REQUIRED_EVENTS.iter().map(|e| e.to_string()).collect(),
        },
    )
}

/// Score a 7-day `eventName × (eventCount, totalUsers)` report.
pub fn score_funnel(rows: &[Row]) -> CheckResult<FunnelDetails> {
    let mut funnel_data = EventStats::from_rows(rows);
    funnel_data.retain(|event, _| FUNNEL_EVENTS.contains(&event.as_str()));

    let funnel = Funnel::from_stats(&funnel_data, "select_item");
    let click_rate = funnel.click_rate();
    let conversion_rate = funnel.conversion_rate();

    let mut penalties = Vec::new();
    if funnel.views < 100 {
        penalties.push(Penalty::new(20, "Low deal page views"));
    }
    if click_rate < 10.0 {
        penalties.push(Penalty::new(30, format!("Low click rate: {:.1}%", click_rate)));
    }
    if conversion_rate < 2.0 {
        penalties.push(Penalty::new(
            40,
            format!("Low conversion rate: {:.1}%", conversion_rate),
        ));
    }

    CheckResult::scored(
        100,
        penalties,
        FunnelDetails {
            funnel_data,
            click_rate: round_to(click_rate, 2),
            conversion_rate: round_to(conversion_rate, 2),
        },
    )
}

/// Score realtime activity. No users at all caps the score at 50 instead of
/// subtracting a penalty.
pub fn score_realtime(active_users: u64, total_events: u64) -> CheckResult<RealtimeDetails> {
    let mut base = 100;
    let mut penalties = Vec::new();

    if active_users == 0 {
        base = 50;
        penalties.push(Penalty::new(0, "No active users in last 29 minutes"));
    } else if active_users < 2 {
        penalties.push(Penalty::new(20, "Low user activity"));
    }

    if total_events == 0 && active_users > 0 {
        penalties.push(Penalty::new(30, "Users present but no events tracked"));
    }

    CheckResult::scored(
        base,
        penalties,
        RealtimeDetails {
            active_users,
            total_events,
        },
    )
}

/// Score a 7-day `customEvent:partner × sourceMedium` report.
pub fn score_attribution(rows: &[Row]) -> CheckResult<AttributionDetails> {
    let mut partners = Tally::new();
    let mut utm_tracking = Tally::new();

    for row in rows {
        let partner = row.dimension(0);
        let source_medium = row.dimension(1);
        let events = row.metric_u64(0);

        if is_set(partner) {
            partners.add(partner, events);
        }
        if source_medium.contains("PRTD") {
            utm_tracking.add(source_medium, events);
        }
    }

    let total_attributed_events = partners.total();

    let mut penalties = Vec::new();
    if partners.is_empty() {
        penalties.push(Penalty::new(40, "No partner attribution data"));
    }
    if utm_tracking.is_empty() {
        penalties.push(Penalty::new(30, "UTM tracking not working"));
    }
    if total_attributed_events < 10 {
        penalties.push(Penalty::new(20, "Low partner attribution volume"));
    }

    CheckResult::scored(
        100,
        penalties,
        AttributionDetails {
            partners,
            utm_tracking,
            total_attributed_events,
        },
    )
}

pub async fn check_core_tracking(source: &dyn ReportSource) -> CheckResult<CoreTrackingDetails> {
    let request = RunReportRequest::builder()
        .dimension("eventName")
        .metric("eventCount")
        .date_range(DateRange::yesterday_to_today())
        .build();

    match source.run_report(&request).await {
        Ok(report) => score_core_tracking(EventCounts::from_rows(&report.rows, 0, 0)),
        Err(e) => {
            warn!("Core tracking check failed: {}", e);
            CheckResult::failed(format!("Failed to check core tracking: {}", e))
        }
    }
}

pub async fn check_conversion_funnel(source: &dyn ReportSource) -> CheckResult<FunnelDetails> {
    let request = RunReportRequest::builder()
        .dimension("eventName")
        .metric("eventCount")
        .metric("totalUsers")
        .date_range(DateRange::days_ago(7))
        .build();

    match source.run_report(&request).await {
        Ok(report) => score_funnel(&report.rows),
        Err(e) => {
            warn!("Conversion funnel check failed: {}", e);
            CheckResult::failed(format!("Failed to check funnel health: {}", e))
        }
    }
}

pub async fn check_realtime(source: &dyn ReportSource) -> CheckResult<RealtimeDetails> {
    let request = RunRealtimeReportRequest::builder()
        .metric("activeUsers")
        .metric("eventCount")
        .minute_range(MinuteRange::last(REALTIME_WINDOW_MINUTES))
        .build();

    match source.run_realtime_report(&request).await {
        Ok(report) => {
            let (users, events) = report
                .first_row()
                .map(|row| (row.metric_u64(0), row.metric_u64(1)))
                .unwrap_or((0, 0));
            score_realtime(users, events)
        }
        Err(e) => {
            warn!("Realtime check failed: {}", e);
            CheckResult::failed(format!("Failed to check real-time health: {}", e))
        }
    }
}

pub async fn check_partner_attribution(
    source: &dyn ReportSource,
) -> CheckResult<AttributionDetails> {
    let request = RunReportRequest::builder()
        .dimension("customEvent:partner")
        .dimension("sourceMedium")
        .metric("eventCount")
        .date_range(DateRange::days_ago(7))
        .build();

    match source.run_report(&request).await {
        Ok(report) => score_attribution(&report.rows),
        Err(e) => {
            warn!("Partner attribution check failed: {}", e);
            CheckResult::failed(format!("Failed to check attribution health: {}", e))
        }
    }
}

/// Run all four checks in sequence, printing progress as each one starts.
pub async fn run_all(source: &dyn ReportSource) -> HealthChecks {
    println!("🔍 Checking core tracking health...");
    let core_tracking = check_core_tracking(source).await;

    println!("📊 Checking conversion funnel health...");
    let conversion_funnel = check_conversion_funnel(source).await;

    println!("⚡ Checking real-time tracking health...");
    let realtime_tracking = check_realtime(source).await;

    println!("🤝 Checking partner attribution health...");
    let partner_attribution = check_partner_attribution(source).await;

    debug!(
        core = core_tracking.health_score,
        funnel = conversion_funnel.health_score,
        realtime = realtime_tracking.health_score,
        attribution = partner_attribution.health_score,
        "Health checks complete"
    );

    HealthChecks {
        core_tracking,
        conversion_funnel,
        realtime_tracking,
        partner_attribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthStatus;
    use crate::source::StaticSource;
    use ga4_client::ClientError;
    use ga4_types::ReportResponse;

    fn report(rows: Vec<Row>) -> Result<ReportResponse, ClientError> {
        Ok(ReportResponse {
            rows,
            ..Default::default()
        })
    }

    #[test]
    fn test_core_tracking_all_present() {
        let found: EventCounts = REQUIRED_EVENTS.iter().map(|e| (*e, 10u64)).collect();
        let result = score_core_tracking(found);
        assert_eq!(result.health_score, 100);
        assert_eq!(result.status, HealthStatus::Healthy);
        assert_eq!(result.details.unwrap().total_events, 50);
    }

    #[test]
    fn test_core_tracking_missing_events() {
        let found: EventCounts = [("page_view", 100u64), ("view_item", 5)].into_iter().collect();
        let result = score_core_tracking(found);

        assert_eq!(result.health_score, 40);
        assert_eq!(result.status, HealthStatus::Critical);
        assert!(result.issues.is_empty());
        let details = result.details.unwrap();
        assert_eq!(
            details.missing_events,
            vec!["select_item", "click_external_deal", "conversion"]
        );
    }

    #[test]
    fn test_core_tracking_nothing_found_clamps_to_zero() {
        let result = score_core_tracking(EventCounts::new());
        assert_eq!(result.health_score, 0);
    }

    #[test]
    fn test_funnel_healthy() {
        let rows = vec![
            Row::new(["view_item"], ["1000", "400"]),
            Row::new(["select_item"], ["200", "150"]),
            Row::new(["click_external_deal"], ["50", "45"]),
            Row::new(["page_view"], ["5000", "900"]),
        ];
        let result = score_funnel(&rows);
        assert_eq!(result.health_score, 100);
        assert!(result.issues.is_empty());

        let details = result.details.unwrap();
        assert_eq!(details.click_rate, 20.0);
        assert_eq!(details.conversion_rate, 5.0);
        assert_eq!(details.funnel_data.len(), 3);
        assert_eq!(details.funnel_data["view_item"].users, 400);
    }

    #[test]
    fn test_funnel_penalties() {
        let rows = vec![
            Row::new(["view_item"], ["60", "30"]),
            Row::new(["select_item"], ["3", "3"]),
            Row::new(["click_external_deal"], ["1", "1"]),
        ];
        let result = score_funnel(&rows);

        // 100 - 20 - 30 - 40
        assert_eq!(result.health_score, 10);
        assert_eq!(result.status, HealthStatus::Critical);
        assert_eq!(
            result.issues,
            vec![
                "Low deal page views",
                "Low click rate: 5.0%",
                "Low conversion rate: 1.7%"
            ]
        );
        assert_eq!(result.details.unwrap().conversion_rate, 1.67);
    }

    #[test]
    fn test_funnel_without_views() {
        let result = score_funnel(&[]);
        assert_eq!(result.health_score, 10);
        let details = result.details.unwrap();
        assert_eq!(details.click_rate, 0.0);
        assert_eq!(details.conversion_rate, 0.0);
    }

    #[test]
    fn test_realtime_no_users_is_warning_at_50() {
        let result = score_realtime(0, 0);
        assert_eq!(result.health_score, 50);
        assert_eq!(result.status, HealthStatus::Warning);
        assert_eq!(result.issues, vec!["No active users in last 29 minutes"]);
    }

    #[test]
    fn test_realtime_single_user() {
        let result = score_realtime(1, 12);
        assert_eq!(result.health_score, 80);
        assert_eq!(result.status, HealthStatus::Healthy);
        assert_eq!(result.issues, vec!["Low user activity"]);
    }

    #[test]
    fn test_realtime_users_without_events() {
        let result = score_realtime(1, 0);
        assert_eq!(result.health_score, 50);
        assert_eq!(
            result.issues,
            vec!["Low user activity", "Users present but no events tracked"]
        );

        let result = score_realtime(5, 0);
        assert_eq!(result.health_score, 70);
    }

    #[test]
    fn test_attribution() {
        let rows = vec![
            Row::new(["acme", "PRTD / referral"], ["8"]),
            Row::new(["acme", "google / organic"], ["4"]),
            Row::new(["(not set)", "PRTD / email"], ["100"]),
            Row::new(["", "direct / none"], ["7"]),
        ];
        let result = score_attribution(&rows);
        assert_eq!(result.health_score, 100);

        let details = result.details.unwrap();
        assert_eq!(details.total_attributed_events, 12);
        assert_eq!(details.partners.len(), 1);
        assert_eq!(details.utm_tracking.get("PRTD / email"), 100);
    }

    #[test]
    fn test_attribution_empty() {
        let result = score_attribution(&[]);
        assert_eq!(result.health_score, 10);
        assert_eq!(
            result.issues,
            vec![
                "No partner attribution data",
                "UTM tracking not working",
                "Low partner attribution volume"
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_is_critical_zero() {
        let source = StaticSource::new("1").with_report(Err(ClientError::Timeout));
        let result = check_core_tracking(&source).await;

        assert_eq!(result.status, HealthStatus::Critical);
        assert_eq!(result.health_score, 0);
        assert!(result.details.is_none());
        assert_eq!(
            result.error.as_deref(),
            Some("Failed to check core tracking: Request timed out")
        );
    }

    #[tokio::test]
    async fn test_run_all_uses_each_report_in_order() {
        let source = StaticSource::new("1")
            .with_report(report(
                REQUIRED_EVENTS
                    .iter()
                    .map(|e| Row::new([*e], ["10"]))
                    .collect(),
            ))
            .with_report(report(vec![
                Row::new(["view_item"], ["1000", "400"]),
                Row::new(["select_item"], ["200", "150"]),
                Row::new(["click_external_deal"], ["50", "45"]),
            ]))
            .with_report(report(vec![Row::new(["acme", "PRTD / cpc"], ["25"])]))
            .with_realtime(report(vec![Row::new(Vec::<String>::new(), ["3", "40"])]));

        let checks = run_all(&source).await;
        assert_eq!(checks.core_tracking.health_score, 100);
        assert_eq!(checks.conversion_funnel.health_score, 100);
        assert_eq!(checks.realtime_tracking.health_score, 100);
        assert_eq!(checks.partner_attribution.health_score, 100);
    }

    #[tokio::test]
    async fn test_realtime_empty_report_counts_as_no_users() {
        let source = StaticSource::new("1");
        let result = check_realtime(&source).await;
        assert_eq!(result.health_score, 50);
        assert_eq!(result.details.unwrap().active_users, 0);
    }
}
