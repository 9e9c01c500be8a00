//! Realtime event monitor.
//!
//! Polls the realtime API on an interval, prints what is happening on the
//! site, raises console alerts for interesting events and keeps the full
//! history for a summary at the end.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use ga4_types::{MinuteRange, RunRealtimeReportRequest};

use crate::data::{Conversion, DealActivity, EventCounts, RealtimeActivity};
use crate::display::rule;
use crate::report::{save_report, Outcome};
use crate::source::ReportSource;

/// Event count at or above which an event raises an alert.
pub const ALERT_THRESHOLDS: [(&str, u64); 4] = [
    ("click_external_deal", 1),
    ("generate_lead", 1),
    ("conversion", 1),
    ("page_view", 10),
];

const ACTIVITY_WINDOW_MINUTES: u32 = 5;
const DEAL_WINDOW_MINUTES: u32 = 10;

/// One poll of the realtime API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Wall-clock time of the poll, `HH:MM:SS`.
    pub timestamp: String,
    pub realtime_data: Outcome<RealtimeActivity>,
    pub deal_activity: Outcome<DealActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSummary {
    /// Number of polls made.
    pub monitoring_duration: usize,
    pub peak_active_users: u64,
    pub total_events_observed: u64,
    pub event_breakdown: EventCounts,
    pub total_conversions: usize,
    pub conversion_details: Vec<Conversion>,
    pub health_status: String,
}

impl MonitorSummary {
    /// Summarize a session. `None` when nothing was polled.
    pub fn from_history(history: &[Tick]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }

        let mut peak_active_users = 0;
        let mut total_events_observed = 0;
        let mut event_breakdown = EventCounts::new();
        let mut conversion_details = Vec::new();

        for tick in history {
            if let Some(realtime) = tick.realtime_data.done() {
                peak_active_users = peak_active_users.max(realtime.active_users);
                total_events_observed += realtime.total_events;
                event_breakdown.extend(&realtime.events);
            }
            if let Some(deals) = tick.deal_activity.done() {
                conversion_details.extend(deals.conversions.iter().cloned());
            }
        }

        Some(Self {
            monitoring_duration: history.len(),
            peak_active_users,
            total_events_observed,
            event_breakdown,
            total_conversions: conversion_details.len(),
            conversion_details,
            health_status: if total_events_observed > 0 {
                "🟢 HEALTHY".to_string()
            } else {
                "🟡 LOW_ACTIVITY".to_string()
            },
        })
    }
}

/// What gets written to `realtime-monitor-{ts}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorReport {
    pub summary: Outcome<MonitorSummary>,
    pub detailed_history: Vec<Tick>,
}

impl MonitorReport {
    pub fn new(history: Vec<Tick>) -> Self {
        let summary = match MonitorSummary::from_history(&history) {
            Some(summary) => Outcome::Done(summary),
            None => Outcome::failed("No monitoring data available"),
        };
        Self {
            summary,
            detailed_history: history,
        }
    }
}

/// Alert lines for one poll.
pub fn alerts(realtime: &Outcome<RealtimeActivity>, deals: &Outcome<DealActivity>) -> Vec<String> {
    let mut alerts = Vec::new();

    if let Some(realtime) = realtime.done() {
        for (event, threshold) in ALERT_THRESHOLDS {
            let count = realtime.events.get(event);
            if count >= threshold {
                alerts.push(format!(
                    "🚨 {}: {} events (threshold: {})",
                    event, count, threshold
                ));
            }
        }
    }

    if let Some(deals) = deals.done() {
        for conversion in &deals.conversions {
            alerts.push(format!(
                "💰 CONVERSION: {} -> {}",
                conversion.deal_id, conversion.partner
            ));
        }
    }

    alerts
}

/// Console block for one poll.
pub fn render_tick(tick: &Tick) -> String {
    let mut lines = vec![
        format!("\n🕐 {} - Real-time Status", tick.timestamp),
        rule(50),
    ];

    let realtime = match &tick.realtime_data {
        Outcome::Done(realtime) => realtime,
        Outcome::Failed { error } => {
            lines.push(format!("❌ Error: {}", error));
            return lines.join("\n");
        }
    };

    lines.push(format!("👥 Active Users: {}", realtime.active_users));
    lines.push(format!("📊 Total Events: {}", realtime.total_events));

    if !realtime.events.is_empty() {
        lines.push(format!(
            "\n📈 Top Events (last {} minutes):",
            ACTIVITY_WINDOW_MINUTES
        ));
        for (event, count) in realtime.events.top(5) {
            lines.push(format!("  • {}: {}", event, count));
        }
    }

    if let Some(deals) = tick.deal_activity.done().filter(|d| !d.deals.is_empty()) {
        lines.push("\n🎯 Deal Activity:".to_string());
        lines.push(format!("  • Active Deals: {}", deals.total_deals));
        lines.push(format!("  • Conversions: {}", deals.total_conversions));

        if !deals.conversions.is_empty() {
            lines.push("  🔥 Recent Conversions:".to_string());
            let skip = deals.conversions.len().saturating_sub(3);
            for conversion in &deals.conversions[skip..] {
                lines.push(format!(
                    "    → {}: {} ({})",
                    conversion.event, conversion.deal_id, conversion.category
                ));
            }
        }
    }

    if !realtime.countries.is_empty() {
        lines.push("\n🌍 Top Countries:".to_string());
        for (country, users) in realtime.countries.top(3) {
            lines.push(format!("  • {}: {} users", country, users));
        }
    }

    lines.join("\n")
}

/// Polls a [`ReportSource`] and keeps every result.
#[derive(Debug)]
pub struct Monitor<'a> {
    source: &'a dyn ReportSource,
    history: Vec<Tick>,
}

impl<'a> Monitor<'a> {
    pub fn new(source: &'a dyn ReportSource) -> Self {
        Self {
            source,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Tick] {
        &self.history
    }

    pub fn into_report(self) -> MonitorReport {
        MonitorReport::new(self.history)
    }

    async fn realtime_data(&self) -> Outcome<RealtimeActivity> {
        let request = RunRealtimeReportRequest::builder()
            .dimension("eventName")
            .dimension("country")
            .dimension("deviceCategory")
            .dimension("pagePath")
            .dimension("pageTitle")
            .metric("activeUsers")
            .metric("eventCount")
            .minute_range(MinuteRange::last(ACTIVITY_WINDOW_MINUTES))
            .build();

        let result = self.source.run_realtime_report(&request).await;
        Outcome::from_result(
            result.map(|r| RealtimeActivity::from_rows(&r.rows)),
            "get real-time data",
        )
    }

    async fn deal_activity(&self) -> Outcome<DealActivity> {
        let request = RunRealtimeReportRequest::builder()
            .dimension("eventName")
            .dimension("customEvent:deal_id")
            .dimension("customEvent:deal_category")
            .dimension("customEvent:partner")
            .dimension("customEvent:click_id")
            .metric("eventCount")
            .metric("activeUsers")
            .minute_range(MinuteRange::last(DEAL_WINDOW_MINUTES))
            .build();

        let result = self.source.run_realtime_report(&request).await;
        Outcome::from_result(
            result.map(|r| DealActivity::from_rows(&r.rows)),
            "get deal activity",
        )
    }

    /// Poll once, print the status and alerts, and record the result.
    pub async fn tick(&mut self) -> &Tick {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let realtime_data = self.realtime_data().await;
        let deal_activity = self.deal_activity().await;

        let tick = Tick {
            timestamp,
            realtime_data,
            deal_activity,
        };
        println!("{}", render_tick(&tick));

        let alerts = alerts(&tick.realtime_data, &tick.deal_activity);
        if !alerts.is_empty() {
            println!("\n🔔 ALERTS:");
            for alert in &alerts {
                println!("  {}", alert);
            }
        }

        let index = self.history.len();
        self.history.push(tick);
        &self.history[index]
    }

    /// Poll every `interval` until `duration` has passed.
    pub async fn run_for(&mut self, duration: Duration, interval: Duration) {
        let end = Instant::now() + duration;
        while Instant::now() < end {
            self.tick().await;
            debug!("Monitor poll {} done", self.history.len());
            tokio::time::sleep(interval).await;
        }
    }
}

/// The `monitor` command. Ctrl+C ends the session early; whatever was
/// collected is still summarized and saved.
pub async fn run_monitor(
    source: &dyn ReportSource,
    output_dir: &Path,
    duration_minutes: u64,
    interval_seconds: u64,
) -> Result<PathBuf> {
    println!(
        "🔍 Starting real-time monitoring for {} minutes...",
        duration_minutes
    );
    println!("⏱️  Checking every {} seconds\n", interval_seconds);

    let mut monitor = Monitor::new(source);
    let duration = Duration::from_secs(duration_minutes * 60);
    let interval = Duration::from_secs(interval_seconds);

    tokio::select! {
        _ = monitor.run_for(duration, interval) => {
            println!(
                "\n✅ Monitoring complete. Processed {} data points.",
                monitor.history().len()
            );
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            println!("\n⏹️  Monitoring stopped by user");
        }
    }

    let report = monitor.into_report();
    let path = save_report(output_dir, "realtime-monitor", &Local::now(), &report)?;
    println!("\n📁 Monitoring results saved to: {}", path.display());

    if let Some(summary) = report.summary.done() {
        println!("\n📊 MONITORING SUMMARY");
        println!("{}", rule(50));
        println!("Peak Users: {}", summary.peak_active_users);
        println!("Total Events: {}", summary.total_events_observed);
        println!("Conversions: {}", summary.total_conversions);
        println!("Status: {}", summary.health_status);
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use ga4_client::ClientError;
    use ga4_types::{ReportResponse, Row};
    use tempfile::TempDir;

    fn response(rows: Vec<Row>) -> ReportResponse {
        ReportResponse {
            rows,
            ..Default::default()
        }
    }

    fn activity_rows() -> Vec<Row> {
        vec![
            Row::new(["page_view", "US", "mobile", "/", "Home"], ["3", "12"]),
            Row::new(["click_external_deal", "US", "mobile", "/deal/a", "A"], ["1", "1"]),
        ]
    }

    fn deal_rows() -> Vec<Row> {
        vec![
            Row::new(["view_item", "deal-a", "hotels", "acme", "(not set)"], ["4", "2"]),
            Row::new(["click_external_deal", "deal-a", "hotels", "acme", "c-1"], ["1", "1"]),
        ]
    }

    #[test]
    fn test_alerts_thresholds_and_conversions() {
        let realtime = Outcome::Done(RealtimeActivity::from_rows(&activity_rows()));
        let deals = Outcome::Done(DealActivity::from_rows(&deal_rows()));

        let alerts = alerts(&realtime, &deals);
        assert_eq!(
            alerts,
            vec![
                "🚨 click_external_deal: 1 events (threshold: 1)".to_string(),
                "🚨 page_view: 12 events (threshold: 10)".to_string(),
                "💰 CONVERSION: deal-a -> acme".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_alerts_below_threshold() {
        let rows = vec![Row::new(["page_view", "US", "mobile", "/", "Home"], ["1", "9"])];
        let realtime = Outcome::Done(RealtimeActivity::from_rows(&rows));
        let deals = Outcome::failed("Failed to get deal activity: boom");
        assert!(alerts(&realtime, &deals).is_empty());
    }

    #[test]
    fn test_render_tick_error() {
        let tick = Tick {
            timestamp: "10:00:00".to_string(),
            realtime_data: Outcome::failed("Failed to get real-time data: down"),
            deal_activity: Outcome::Done(DealActivity::default()),
        };
        let out = render_tick(&tick);
        assert!(out.contains("🕐 10:00:00 - Real-time Status"));
        assert!(out.contains("❌ Error: Failed to get real-time data: down"));
        assert!(!out.contains("Active Users"));
    }

    #[test]
    fn test_render_tick_shows_last_three_conversions() {
        let rows: Vec<Row> = (1..=5)
            .map(|i| {
                Row::new(
                    [
                        "conversion".to_string(),
                        format!("deal-{}", i),
                        "tours".to_string(),
                        "p".to_string(),
                        "c".to_string(),
                    ],
                    ["1", "1"],
                )
            })
            .collect();
        let tick = Tick {
            timestamp: "10:00:00".to_string(),
            realtime_data: Outcome::Done(RealtimeActivity::from_rows(&activity_rows())),
            deal_activity: Outcome::Done(DealActivity::from_rows(&rows)),
        };

        let out = render_tick(&tick);
        assert!(out.contains("• Active Deals: 5"));
        assert!(!out.contains("deal-2 (tours)"));
        assert!(out.contains("→ conversion: deal-3 (tours)"));
        assert!(out.contains("→ conversion: deal-5 (tours)"));
        assert!(out.contains("• US: 4 users"));
    }

    #[test]
    fn test_summary_peak_and_totals() {
        let tick = |users: &str, events: &str| Tick {
            timestamp: "00:00:00".to_string(),
            realtime_data: Outcome::Done(RealtimeActivity::from_rows(&[Row::new(
                ["page_view", "US", "desktop", "/", "Home"],
                [users, events],
            )])),
            deal_activity: Outcome::Done(DealActivity::from_rows(&deal_rows())),
        };
        let history = vec![tick("2", "10"), tick("5", "3"), tick("1", "0")];

        let summary = MonitorSummary::from_history(&history).unwrap();
        assert_eq!(summary.monitoring_duration, 3);
        assert_eq!(summary.peak_active_users, 5);
        assert_eq!(summary.total_events_observed, 13);
        assert_eq!(summary.event_breakdown.get("page_view"), 13);
        assert_eq!(summary.total_conversions, 3);
        assert_eq!(summary.health_status, "🟢 HEALTHY");
    }

    #[test]
    fn test_empty_history_summary_is_error() {
        let report = MonitorReport::new(Vec::new());
        assert_eq!(
            serde_json::to_value(&report.summary).unwrap(),
            serde_json::json!({"error": "No monitoring data available"})
        );
    }

    #[tokio::test]
    async fn test_tick_records_failures() {
        let source = StaticSource::new("1")
            .with_realtime(Err(ClientError::Timeout))
            .with_realtime(Ok(response(deal_rows())));
        let mut monitor = Monitor::new(&source);

        let tick = monitor.tick().await;
        assert_eq!(
            tick.realtime_data.error(),
            Some("Failed to get real-time data: Request timed out")
        );
        assert_eq!(tick.deal_activity.done().unwrap().total_deals, 1);

        let summary = MonitorSummary::from_history(monitor.history()).unwrap();
        assert_eq!(summary.health_status, "🟡 LOW_ACTIVITY");
        assert_eq!(summary.total_conversions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_monitor_saves_report() {
        let dir = TempDir::new().unwrap();
        let source = StaticSource::new("1")
            .with_realtime(Ok(response(activity_rows())))
            .with_realtime(Ok(response(deal_rows())));

        let path = run_monitor(&source, dir.path(), 1, 30).await.unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["summary"]["monitoring_duration"], 2);
        assert_eq!(saved["summary"]["peak_active_users"], 4);
        assert_eq!(saved["detailed_history"].as_array().unwrap().len(), 2);
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("realtime-monitor-"));
    }
}
