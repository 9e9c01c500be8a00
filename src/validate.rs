//! Tracking validation suite.
//!
//! Five validations run one after another; each either produces its data
//! or records the error that stopped it. Four of them carry a
//! pass/warning/fail verdict. Realtime activity is reported without one, so
//! the suite score, the share of the five that passed, tops out at 80%.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use ga4_types::{
    DateRange, FilterExpression, MinuteRange, ReportResponse, RunRealtimeReportRequest,
    RunReportRequest,
};

use crate::data::{EventCounts, EventStats, Funnel, Tally};
use crate::display::{rule, thousands, title_case};
use crate::health::Thresholds;
use crate::report::Outcome;
use crate::source::ReportSource;

/// Days of history each validation looks at.
pub const DAYS_BACK: u32 = 7;

pub const EXPECTED_EVENTS: [&str; 8] = [
    "page_view",
    "view_item",
    "select_content",
    "click_external_deal",
    "conversion",
    "share",
    "scroll",
    "generate_lead",
];

const DEAL_FILTER_EVENTS: [&str; 3] = ["view_item", "select_content", "click_external_deal"];
const DEAL_EVENTS: [&str; 4] = [
    "view_item",
    "select_content",
    "click_external_deal",
    "conversion",
];
const PARTNER_FILTER_EVENTS: [&str; 2] = ["click_external_deal", "conversion"];

/// Suites scoring at least this pass overall.
const PASS_SCORE: f64 = 70.0;

/// Verdict of a single validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    #[serde(rename = "✅ PASS")]
    Pass,
    #[serde(rename = "⚠️  WARNING")]
    Warning,
    #[serde(rename = "❌ FAIL")]
    Fail,
}

impl ValidationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "✅ PASS",
            ValidationStatus::Warning => "⚠️  WARNING",
            ValidationStatus::Fail => "❌ FAIL",
        }
    }
}

/// Whether anyone is on the site right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[serde(rename = "🟢 ACTIVE")]
    Active,
    #[serde(rename = "🔴 INACTIVE")]
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreEventsValidation {
    pub total_events_tracked: usize,
    pub expected_events: usize,
    pub found_events: Vec<String>,
    pub missing_events: Vec<String>,
    pub event_counts: EventCounts,
    pub validation_status: ValidationStatus,
    pub summary: String,
}

impl CoreEventsValidation {
    pub fn from_report(report: &ReportResponse) -> Self {
        let event_counts = EventCounts::from_rows(&report.rows, 0, 0);
        let found_events: Vec<String> = event_counts.iter().map(|(name, _)| name.to_string()).collect();
        let missing_events: Vec<String> = event_counts
            .missing(&EXPECTED_EVENTS)
            .into_iter()
            .map(String::from)
            .collect();

        let validation_status = if missing_events.is_empty() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Warning
        };

        Self {
            total_events_tracked: found_events.len(),
            expected_events: EXPECTED_EVENTS.len(),
            summary: format!(
                "Found {}/{} expected events",
                found_events.len(),
                EXPECTED_EVENTS.len()
            ),
            found_events,
            missing_events,
            event_counts,
            validation_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealTrackingValidation {
    pub total_deal_events: u64,
    pub events_by_type: EventCounts,
    pub validation_status: ValidationStatus,
    pub summary: String,
}

impl DealTrackingValidation {
    pub fn from_report(report: &ReportResponse) -> Self {
        let events_by_type = EventCounts::from_rows(&report.rows, 0, 0);
        let total_deal_events: u64 = DEAL_EVENTS.iter().map(|e| events_by_type.get(e)).sum();

        Self {
            validation_status: if total_deal_events > 0 {
                ValidationStatus::Pass
            } else {
                ValidationStatus::Fail
            },
            summary: format!("Tracked {} deal-related events", total_deal_events),
            total_deal_events,
            events_by_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeValidation {
    pub active_users: u64,
    pub total_events: u64,
    pub countries: Tally,
    pub devices: Tally,
    pub status: ActivityStatus,
}

impl RealtimeValidation {
    /// `global` has no dimensions; `breakdown` is `country × deviceCategory`.
    pub fn from_reports(global: &ReportResponse, breakdown: &ReportResponse) -> Self {
        let (active_users, total_events) = global
            .first_row()
            .map(|row| (row.metric_u64(0), row.metric_u64(1)))
            .unwrap_or((0, 0));

        Self {
            active_users,
            total_events,
            countries: Tally::from_rows(&breakdown.rows, 0, 0),
            devices: Tally::from_rows(&breakdown.rows, 1, 0),
            status: if active_users > 0 {
                ActivityStatus::Active
            } else {
                ActivityStatus::Inactive
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelValidation {
    pub funnel_data: BTreeMap<String, EventStats>,
    pub click_rate: String,
    pub conversion_rate: String,
    pub validation_status: ValidationStatus,
}

impl FunnelValidation {
    pub fn from_report(report: &ReportResponse) -> Self {
        let funnel_data = EventStats::from_rows(&report.rows);
        let funnel = Funnel::from_stats(&funnel_data, "select_content");

        Self {
            click_rate: format!("{:.1}%", funnel.click_rate()),
            conversion_rate: format!("{:.1}%", funnel.conversion_rate()),
            validation_status: if funnel.views > 0 {
                ValidationStatus::Pass
            } else {
                ValidationStatus::Fail
            },
            funnel_data,
        }
    }
}

/// Events from one `sourceMedium`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceAttribution {
    pub total_events: u64,
    pub events: EventCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerValidation {
    pub source_attribution: BTreeMap<String, SourceAttribution>,
    pub partner_sources: BTreeMap<String, SourceAttribution>,
    pub total_attributed_events: u64,
    pub validation_status: ValidationStatus,
}

impl PartnerValidation {
    /// `report` is `eventName × sourceMedium → eventCount`.
    pub fn from_report(report: &ReportResponse) -> Self {
        let mut source_attribution: BTreeMap<String, SourceAttribution> = BTreeMap::new();
        let mut total_attributed_events = 0;

        for row in &report.rows {
            let events = row.metric_u64(0);
            total_attributed_events += events;

            let source = source_attribution
                .entry(row.dimension(1).to_string())
                .or_default();
            source.total_events += events;
            source.events.add(row.dimension(0), events);
        }

        let partner_sources = source_attribution
            .iter()
            .filter(|(source, _)| {
                let source = source.to_lowercase();
                source.contains("prtd") || source.contains("partner")
            })
            .map(|(source, data)| (source.clone(), data.clone()))
            .collect();

        Self {
            source_attribution,
            partner_sources,
            total_attributed_events,
            validation_status: if total_attributed_events > 0 {
                ValidationStatus::Pass
            } else {
                ValidationStatus::Warning
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validations {
    pub core_events: Outcome<CoreEventsValidation>,
    pub deal_tracking: Outcome<DealTrackingValidation>,
    pub realtime_activity: Outcome<RealtimeValidation>,
    pub conversion_funnel: Outcome<FunnelValidation>,
    pub partner_attribution: Outcome<PartnerValidation>,
}

impl Validations {
    const COUNT: usize = 5;

    /// How many validations passed. Realtime activity carries no
    /// pass/fail grade and never counts.
    pub fn passed(&self) -> usize {
        [
            self.core_events
                .done()
                .map(|v| v.validation_status == ValidationStatus::Pass),
            self.deal_tracking
                .done()
                .map(|v| v.validation_status == ValidationStatus::Pass),
            self.conversion_funnel
                .done()
                .map(|v| v.validation_status == ValidationStatus::Pass),
            self.partner_attribution
                .done()
                .map(|v| v.validation_status == ValidationStatus::Pass),
        ]
        .into_iter()
        .filter(|passed| *passed == Some(true))
        .count()
    }
}

/// Label for the suite score.
pub fn overall_label(score: f64) -> &'static str {
    match Thresholds::default().status_for(score) {
        crate::health::HealthStatus::Healthy => "🟢 HEALTHY",
        crate::health::HealthStatus::Warning => "🟡 NEEDS_ATTENTION",
        crate::health::HealthStatus::Critical => "🔴 CRITICAL",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: DateTime<Local>,
    pub property_id: String,
    pub validations: Validations,
    pub health_score: f64,
    pub overall_status: String,
}

impl ValidationReport {
    pub fn new(property_id: &str, validations: Validations, timestamp: DateTime<Local>) -> Self {
        let health_score = validations.passed() as f64 / Validations::COUNT as f64 * 100.0;
        Self {
            timestamp,
            property_id: property_id.to_string(),
            overall_status: overall_label(health_score).to_string(),
            health_score,
            validations,
        }
    }

    pub fn passed(&self) -> bool {
        self.health_score >= PASS_SCORE
    }
}

fn events_filter(events: &[&str]) -> FilterExpression {
    FilterExpression::any_of_exact("eventName", events.iter().copied())
}

pub async fn validate_core_events(source: &dyn ReportSource) -> Outcome<CoreEventsValidation> {
    println!("🔍 Validating core events for last {} days...", DAYS_BACK);

    let request = RunReportRequest::builder()
        .dimension("eventName")
        .metric("eventCount")
        .metric("eventCountPerUser")
        .date_range(DateRange::days_ago(DAYS_BACK))
        .filter(events_filter(&EXPECTED_EVENTS))
        .build();

    let result = source.run_report(&request).await;
    Outcome::from_result(
        result.map(|r| CoreEventsValidation::from_report(&r)),
        "validate events",
    )
}

pub async fn validate_deal_tracking(source: &dyn ReportSource) -> Outcome<DealTrackingValidation> {
    println!("📊 Validating deal tracking for last {} days...", DAYS_BACK);

    let request = RunReportRequest::builder()
        .dimension("eventName")
        .metric("eventCount")
        .metric("totalUsers")
        .metric("eventValue")
        .date_range(DateRange::days_ago(DAYS_BACK))
        .filter(events_filter(&DEAL_FILTER_EVENTS))
        .build();

    let result = source.run_report(&request).await;
    Outcome::from_result(
        result.map(|r| DealTrackingValidation::from_report(&r)),
        "validate deal tracking",
    )
}

pub async fn check_realtime_activity(source: &dyn ReportSource) -> Outcome<RealtimeValidation> {
    println!("⚡ Checking real-time activity...");

    let global = RunRealtimeReportRequest::builder()
        .metric("activeUsers")
        .metric("eventCount")
        .minute_range(MinuteRange::last(29))
        .build();
    let breakdown = RunRealtimeReportRequest::builder()
        .dimension("country")
        .dimension("deviceCategory")
        .metric("activeUsers")
        .minute_range(MinuteRange::last(29))
        .build();

    let result = async {
        let global = source.run_realtime_report(&global).await?;
        let breakdown = source.run_realtime_report(&breakdown).await?;
        Ok(RealtimeValidation::from_reports(&global, &breakdown))
    }
    .await;

    Outcome::from_result(result, "get realtime data")
}

pub async fn validate_conversion_funnel(source: &dyn ReportSource) -> Outcome<FunnelValidation> {
    println!("🔄 Validating conversion funnel for last {} days...", DAYS_BACK);

    let request = RunReportRequest::builder()
        .dimension("eventName")
        .metric("eventCount")
        .metric("totalUsers")
        .date_range(DateRange::days_ago(DAYS_BACK))
        .filter(events_filter(&DEAL_FILTER_EVENTS))
        .build();

    let result = source.run_report(&request).await;
    Outcome::from_result(
        result.map(|r| FunnelValidation::from_report(&r)),
        "validate conversion funnel",
    )
}

pub async fn validate_partner_attribution(source: &dyn ReportSource) -> Outcome<PartnerValidation> {
    println!("🤝 Validating partner attribution for last {} days...", DAYS_BACK);

    let request = RunReportRequest::builder()
        .dimension("eventName")
        .dimension("sourceMedium")
        .metric("eventCount")
        .date_range(DateRange::days_ago(DAYS_BACK))
        .filter(events_filter(&PARTNER_FILTER_EVENTS))
        .build();

    let result = source.run_report(&request).await;
    Outcome::from_result(
        result.map(|r| PartnerValidation::from_report(&r)),
        "validate partner attribution",
    )
}

fn print_step<T>(outcome: &Outcome<T>, summary: Option<&str>, status: Option<&str>) {
    match outcome {
        Outcome::Failed { error } => println!("❌ Failed: {}", error),
        Outcome::Done(_) => {
            if let Some(summary) = summary {
                println!("✓ {}", summary);
            }
            if let Some(status) = status {
                println!("Status: {}", status);
            }
        }
    }
}

fn heading(name: &str) {
    println!("\n--- {} ---", title_case(name));
}

/// Run the full suite, printing each step.
pub async fn run_validation(source: &dyn ReportSource) -> ValidationReport {
    println!("🚀 Starting PRTD Analytics Validation Suite...\n");
    let timestamp = Local::now();

    heading("core_events");
    let core_events = validate_core_events(source).await;
    let (summary, status) = core_events
        .done()
        .map(|v| (Some(v.summary.as_str()), Some(v.validation_status.label())))
        .unwrap_or((None, None));
    print_step(&core_events, summary, status);

    heading("deal_tracking");
    let deal_tracking = validate_deal_tracking(source).await;
    let (summary, status) = deal_tracking
        .done()
        .map(|v| (Some(v.summary.as_str()), Some(v.validation_status.label())))
        .unwrap_or((None, None));
    print_step(&deal_tracking, summary, status);

    heading("realtime_activity");
    let realtime_activity = check_realtime_activity(source).await;
    print_step(&realtime_activity, None, None);

    heading("conversion_funnel");
    let conversion_funnel = validate_conversion_funnel(source).await;
    let status = conversion_funnel.done().map(|v| v.validation_status.label());
    print_step(&conversion_funnel, None, status);

    heading("partner_attribution");
    let partner_attribution = validate_partner_attribution(source).await;
    let status = partner_attribution.done().map(|v| v.validation_status.label());
    print_step(&partner_attribution, None, status);

    let validations = Validations {
        core_events,
        deal_tracking,
        realtime_activity,
        conversion_funnel,
        partner_attribution,
    };

    ValidationReport::new(source.property().as_str(), validations, timestamp)
}

/// Console summary of a finished suite.
pub fn render_summary(report: &ValidationReport) -> String {
    let mut lines = vec![
        format!("\n{}", rule(60)),
        "🎯 PRTD Analytics Validation Report".to_string(),
        rule(60),
        format!(
            "Overall Score: {:.0}% | Status: {}",
            report.health_score, report.overall_status
        ),
        format!(
            "Property: {} | Time: {}",
            report.property_id,
            report.timestamp.format("%Y-%m-%dT%H:%M:%S")
        ),
    ];

    let core = report.validations.core_events.done();
    if let Some(core) = core.filter(|c| !c.event_counts.is_empty()) {
        let counts = &core.event_counts;
        lines.push(format!("\n📊 Key Metrics ({} days):", DAYS_BACK));
        lines.push(format!("  Total Events: {}", thousands(counts.total())));
        lines.push(format!("  Page Views: {}", thousands(counts.get("page_view"))));
        lines.push(format!(
            "  Deal Clicks: {}",
            thousands(counts.get("click_external_deal"))
        ));
        lines.push(format!("  Conversions: {}", thousands(counts.get("conversion"))));
    }

    if let Some(funnel) = report.validations.conversion_funnel.done() {
        lines.push(format!("  Conversion Rate: {}", funnel.conversion_rate));
    }

    if let Some(core) = core.filter(|c| !c.missing_events.is_empty()) {
        lines.push(format!("\n⚠️  Missing Events: {}", core.missing_events.join(", ")));
    }

    lines.push(format!(
        "\n🚨 OVERALL: {}",
        if report.passed() { "PASS" } else { "FAIL" }
    ));
    lines.push(rule(60));
    lines.join("\n")
}
