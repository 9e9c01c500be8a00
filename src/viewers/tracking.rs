//! The `tracking` view: events, deals and conversions over the last week.

use std::collections::BTreeMap;

use ga4_types::{DateRange, FilterExpression, ReportResponse, Row, RunReportRequest};

use super::{header, no_data, section_body};
use crate::data::{EventStats, Tally};
use crate::display::{event_emoji, rule, thousands};
use crate::source::ReportSource;

const DAYS_BACK: u32 = 7;
const TOP_DEALS: usize = 10;

const CONVERSION_EVENTS: [&str; 4] = [
    "click_external_deal",
    "conversion",
    "generate_lead",
    "share",
];

/// Activity on one deal page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DealPerformance {
    pub slug: String,
    pub category: String,
    pub events: Tally,
    pub total_events: u64,
    pub total_users: u64,
}

impl DealPerformance {
    /// Group `slug × category × eventName → (eventCount, totalUsers)` rows
    /// by slug, busiest deal first.
    pub fn from_rows(rows: &[Row]) -> Vec<DealPerformance> {
        let mut deals: BTreeMap<String, DealPerformance> = BTreeMap::new();

        for row in rows {
            let slug = row.dimension_or(0, "unknown");
            let deal = deals
                .entry(slug.to_string())
                .or_insert_with(|| DealPerformance {
                    slug: slug.to_string(),
                    category: row.dimension_or(1, "unknown").to_string(),
                    ..Default::default()
                });

            let events = row.metric_u64(0);
            deal.events.add(row.dimension(2), events);
            deal.total_events += events;
            deal.total_users += row.metric_u64(1);
        }

        let mut deals: Vec<DealPerformance> = deals.into_values().collect();
        deals.sort_by(|a, b| b.total_events.cmp(&a.total_events));
        deals
    }
}

/// One conversion event with its per-vendor split.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionSummary {
    pub events: u64,
    pub users: u64,
    pub vendors: Tally,
}

impl ConversionSummary {
    /// Group `eventName × vendor_id × cta_id → (eventCount, totalUsers)`
    /// rows by event.
    pub fn from_rows(rows: &[Row]) -> BTreeMap<String, ConversionSummary> {
        let mut summary: BTreeMap<String, ConversionSummary> = BTreeMap::new();
        for row in rows {
            let events = row.metric_u64(0);
            let entry = summary.entry(row.dimension(0).to_string()).or_default();
            entry.events += events;
            entry.users += row.metric_u64(1);
            entry.vendors.add(row.dimension_or(1, "unknown"), events);
        }
        summary
    }
}

fn current_events_request() -> RunReportRequest {
    RunReportRequest::builder()
        .dimension("eventName")
        .dimension("customEvent:slug")
        .dimension("customEvent:deal_id")
        .dimension("customEvent:category")
        .metric("eventCount")
        .metric("totalUsers")
        .date_range(DateRange::days_ago(DAYS_BACK))
        .limit(50)
        .build()
}

fn deal_performance_request() -> RunReportRequest {
    RunReportRequest::builder()
        .dimension("customEvent:slug")
        .dimension("customEvent:category")
        .dimension("eventName")
        .metric("eventCount")
        .metric("totalUsers")
        .date_range(DateRange::days_ago(DAYS_BACK))
        // any non-empty slug
        .filter(FilterExpression::partial_regexp("customEvent:slug", "."))
        .limit(20)
        .build()
}

fn conversion_request() -> RunReportRequest {
    RunReportRequest::builder()
        .dimension("eventName")
        .dimension("customEvent:vendor_id")
        .dimension("customEvent:cta_id")
        .metric("eventCount")
        .metric("totalUsers")
        .date_range(DateRange::days_ago(DAYS_BACK))
        .filter(FilterExpression::in_list("eventName", CONVERSION_EVENTS))
        .limit(30)
        .build()
}

pub fn render_current_events(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No events found in the last 7 days",
            "Visit your site to generate tracking data",
        );
    }

    let mut events: Vec<(String, EventStats)> =
        EventStats::from_rows(&report.rows).into_iter().collect();
    events.sort_by(|a, b| b.1.events.cmp(&a.1.events).then_with(|| a.0.cmp(&b.0)));

    let mut out = format!("Found {} different event types:\n", report.rows.len());
    for (event, stats) in events {
        out.push_str(&format!(
            "\n{} {}\n   Events: {} | Users: {}\n",
            event_emoji(&event),
            event,
            thousands(stats.events),
            thousands(stats.users)
        ));
    }
    out
}

pub fn render_deal_performance(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No deal-specific data found yet",
            "Visit deal pages to generate tracking data",
        );
    }

    let deals = DealPerformance::from_rows(&report.rows);
    let shown = deals.len().min(TOP_DEALS);
    let mut out = format!("Top {} performing deals:\n", shown);

    for deal in deals.iter().take(TOP_DEALS) {
        out.push_str(&format!(
            "\n🏨 {} ({})\n   Total Events: {} | Users: {}\n",
            deal.slug,
            deal.category,
            thousands(deal.total_events),
            thousands(deal.total_users)
        ));
        for (event, count) in deal.events.top(3) {
            out.push_str(&format!("   {} {}: {}\n", event_emoji(event), event, thousands(count)));
        }
    }
    out
}

pub fn render_conversions(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No conversion events found yet",
            "Click 'Get This Deal' buttons to generate conversion data",
        );
    }

    let mut out = String::new();
    for (event, summary) in ConversionSummary::from_rows(&report.rows) {
        out.push_str(&format!(
            "{} {}\n   Events: {} | Users: {}\n",
            event_emoji(&event),
            event,
            thousands(summary.events),
            thousands(summary.users)
        ));
        for (vendor, count) in summary.vendors.top(3) {
            out.push_str(&format!("   📊 {}: {} events\n", vendor, thousands(count)));
        }
        out.push('\n');
    }
    out
}

/// Sample payloads of the engagement events deal pages send.
pub fn tracking_examples() -> String {
    let examples: [(&str, &str, &[(&str, &str)]); 3] = [
        (
            "content_engagement",
            "User hovers over deal image",
            &[
                ("interaction_type", "image_hover"),
                ("content_piece", "deal_gallery"),
                ("slug", "marriott-deal-50-off"),
                ("category", "hotels"),
                ("engagement_depth", "10"),
            ],
        ),
        (
            "content_engagement",
            "User selects text in highlights section",
            &[
                ("interaction_type", "text_selection"),
                ("content_piece", "highlights"),
                ("selection_length", "45"),
                ("reading_time", "12.5"),
            ],
        ),
        (
            "engagement_quality_score",
            "User completes page interaction",
            &[
                ("engagement_score", "75"),
                ("engagement_quality", "high"),
                ("time_score", "20"),
                ("interaction_score", "25"),
            ],
        ),
    ];

    let mut out = String::new();
    for (i, (event, trigger, params)) in examples.iter().enumerate() {
        out.push_str(&format!("Example {}: {}\n", i + 1, trigger));
        out.push_str(&format!("📊 Event: {}\n", event));
        for (key, value) in params.iter() {
            out.push_str(&format!("   {}: {}\n", key, value));
        }
        out.push('\n');
    }
    out
}

/// The `tracking` command.
pub async fn run_tracking(source: &dyn ReportSource) {
    let property = source.property();
    println!("🔍 PRTD ANALYTICS TRACKING OVERVIEW");
    println!("Property: {}", property);
    println!("Date Range: Last {} days", DAYS_BACK);
    println!("{}", rule(60));

    println!("{}", header("📊 CURRENT TRACKING EVENTS (Last 7 days)"));
    let result = source.run_report(&current_events_request()).await;
    println!("{}", section_body(result, "current events", render_current_events));

    println!("{}", header("🎯 DEAL PERFORMANCE (Last 7 days)"));
    let result = source.run_report(&deal_performance_request()).await;
    println!("{}", section_body(result, "deal performance", render_deal_performance));

    println!("{}", header("💰 CONVERSION TRACKING (Last 7 days)"));
    let result = source.run_report(&conversion_request()).await;
    println!("{}", section_body(result, "conversion data", render_conversions));

    println!("{}", header("🎯 CONTENT ENGAGEMENT TRACKING EXAMPLES"));
    println!("{}", tracking_examples());

    println!("\n💡 NEXT STEPS:");
    println!("1. 📖 Read the exploration setup guide: prtd-analytics guide");
    println!("2. 🌐 Visit deal pages and interact with content (hover, click, select text)");
    println!("3. ⏰ Wait 24-48 hours for data to populate in GA4");
    println!("4. 📊 Create custom explorations using the guide");
    println!("5. 🔄 Run this command again to see new engagement data");

    println!("\n🔗 GA4 Property URL:");
    println!("{}", property.home_url());
}
