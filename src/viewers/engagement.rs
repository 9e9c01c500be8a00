//! The `engagement` view: content, image and section engagement events and
//! the quality scores deal pages report.


use ga4_types::{DateRange, FilterExpression, ReportResponse, RunReportRequest};

use super::{header, no_data, section_body};
use crate::display::{rule, title_case};
use crate::source::ReportSource;

const DAYS_BACK: u32 = 7;

/// Custom dimensions worth slicing engagement data by.
pub const DIMENSION_CATALOGUE: [(&str, &str); 12] = [
    ("slug", "Deal/page identifier"),
    ("deal_id", "Unique deal ID"),
    ("vendor_id", "Partner/vendor ID"),
    ("category", "Deal category"),
    ("position", "Element position"),
    ("cta_id", "Call-to-action ID"),
    ("interaction_type", "Type of interaction"),
    ("content_piece", "Content section"),
    ("engagement_quality", "Low/medium/high"),
    ("section_version", "A/B test variant"),
    ("request_id", "Debug trace ID"),
    ("status_code", "Response status"),
];

fn engagement_request(
    dimensions: &[&str],
    metrics: &[&str],
    filter: FilterExpression,
    limit: u64,
) -> RunReportRequest {
    let builder = dimensions
        .iter()
        .fold(RunReportRequest::builder(), |b, d| b.dimension(*d));
    metrics
        .iter()
        .fold(builder, |b, m| b.metric(*m))
        .date_range(DateRange::days_ago(DAYS_BACK))
        .filter(filter)
        .limit(limit)
        .build()
}

fn content_request() -> RunReportRequest {
    engagement_request(
        &[
            "eventName",
            "customEvent:slug",
            "customEvent:category",
            "customEvent:interaction_type",
            "customEvent:content_piece",
        ],
        &["eventCount", "averageSessionDuration", "engagementRate"],
        FilterExpression::exact("eventName", "content_engagement"),
        20,
    )
}

fn image_request() -> RunReportRequest {
    engagement_request(
        &[
            "eventName",
            "customEvent:slug",
            "customEvent:image_index",
            "customEvent:view_duration",
        ],
        &["eventCount"],
        FilterExpression::contains("eventName", "image"),
        15,
    )
}

fn section_request() -> RunReportRequest {
    engagement_request(
        &[
            "eventName",
            "customEvent:slug",
            "customEvent:time_in_section",
            "customEvent:interaction_count",
        ],
        &["eventCount", "totalUsers"],
        FilterExpression::exact("eventName", "section_engagement"),
        15,
    )
}

fn score_request() -> RunReportRequest {
    engagement_request(
        &[
            "eventName",
            "customEvent:slug",
            "customEvent:engagement_score",
            "customEvent:engagement_quality",
        ],
        &["eventCount"],
        FilterExpression::exact("eventName", "engagement_quality_score"),
        10,
    )
}

pub fn render_content(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No content engagement events found yet",
            "Visit a deal page and interact with images/text to generate data",
        );
    }

    let mut out = format!("Found {} content engagement events:\n", report.rows.len());
    for row in &report.rows {
        out.push_str(&format!(
            "\n🎯 {} on {}\n   Deal: {} ({})\n   Events: {}\n",
            title_case(row.dimension_or(3, "unknown")),
            row.dimension_or(4, "unknown"),
            row.dimension_or(1, "unknown"),
            row.dimension_or(2, "unknown"),
            row.metric(0)
        ));
    }
    out
}

pub fn render_images(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No image engagement events found yet",
            "Hover over or click deal images to generate data",
        );
    }

    let mut out = format!("Found {} image engagement events:\n", report.rows.len());
    for row in &report.rows {
        out.push_str(&format!(
            "\n🖼️  {} - Image #{}\n   Deal: {}\n   View time: {}s\n   Events: {}\n",
            row.dimension(0),
            row.dimension_or(2, "0"),
            row.dimension_or(1, "unknown"),
            row.dimension_or(3, "0"),
            row.metric(0)
        ));
    }
    out
}

pub fn render_sections(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No section engagement events found yet",
            "Scroll through deal page sections to generate data",
        );
    }

    let mut out = format!("Found {} section engagement events:\n", report.rows.len());
    for row in &report.rows {
        out.push_str(&format!(
            "\n📄 Section engagement\n   Deal: {}\n   Time in section: {}s\n   Interactions: {}\n   Events: {} | Users: {}\n",
            row.dimension_or(1, "unknown"),
            row.dimension_or(2, "0"),
            row.dimension_or(3, "0"),
            row.metric(0),
            row.metric(1)
        ));
    }
    out
}

fn quality_emoji(quality: &str) -> &'static str {
    match quality {
        "high" => "🏆",
        "medium" => "🥈",
        _ => "🥉",
    }
}

pub fn render_scores(report: &ReportResponse) -> String {
    if report.is_empty() {
        return no_data(
            "No engagement scores found yet",
            "Spend time on deal pages to generate engagement scores",
        );
    }

    let mut out = format!("Found {} engagement scores:\n", report.rows.len());
    for row in &report.rows {
        let quality = row.dimension_or(3, "unknown");
        out.push_str(&format!(
            "\n{} {} Quality - Score: {}/100\n   Deal: {}\n   Recorded: {} times\n",
            quality_emoji(quality),
            title_case(quality),
            row.dimension_or(2, "0"),
            row.dimension_or(1, "unknown"),
            row.metric(0)
        ));
    }
    out
}

pub fn dimension_catalogue() -> String {
    let mut out = String::from("Available custom dimensions for analysis:\n");
    for (dimension, description) in DIMENSION_CATALOGUE {
        out.push_str(&format!("📊 customEvent:{}\n   {}\n\n", dimension, description));
    }
    out
}

/// The `engagement` command.
pub async fn run_engagement(source: &dyn ReportSource) {
    println!("🔍 PRTD ENGAGEMENT TRACKING DATA VIEWER");
    println!("Property: {}", source.property());
    println!("Date Range: Last {} days", DAYS_BACK);
    println!("{}", rule(60));

    println!("{}", header("📊 CONTENT ENGAGEMENT TRACKING DATA"));
    let result = source.run_report(&content_request()).await;
    println!("{}", section_body(result, "content engagement data", render_content));

    println!("{}", header("🖼️  IMAGE ENGAGEMENT TRACKING DATA"));
    let result = source.run_report(&image_request()).await;
    println!("{}", section_body(result, "image engagement data", render_images));

    println!("{}", header("📄 SECTION ENGAGEMENT TRACKING DATA"));
    let result = source.run_report(&section_request()).await;
    println!("{}", section_body(result, "section engagement data", render_sections));

    println!("{}", header("🏆 ENGAGEMENT QUALITY SCORES"));
    let result = source.run_report(&score_request()).await;
    println!("{}", section_body(result, "engagement scores", render_scores));

    println!("{}", header("🏷️  CUSTOM DIMENSIONS SAMPLE"));
    println!("{}", dimension_catalogue());

    println!("\n💡 NEXT STEPS:");
    println!("1. Visit deal pages and interact with content to generate more data");
    println!("2. Use the exploration setup guide to create custom reports");
    println!("3. Run this command again in 24-48 hours to see accumulated data");
    println!("\n🔗 Build custom GA4 explorations with: prtd-analytics guide");
}
