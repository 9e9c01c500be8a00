//! The `health` command.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tracing::{error, warn};

use super::alert::{self, AlertState};
use super::{checks, HealthReport, HealthStatus};
use crate::config::EmailSettings;
use crate::report::save_report;
use crate::source::ReportSource;

/// Pause after a failed iteration of the continuous loop.
const RETRY_DELAY: Duration = Duration::from_secs(60);

/// Console summary of a report.
pub fn render_summary(report: &HealthReport) -> String {
    let rule = "=".repeat(60);
    let mut lines = vec![
        format!("\n{}", rule),
        "🏥 PRTD Analytics Health Check".to_string(),
        rule.clone(),
        format!(
            "Status: {} {} | Score: {:.0}%",
            report.status_emoji,
            report.overall_status.label(),
            report.overall_score
        ),
        format!("Time: {}", report.timestamp.format("%Y-%m-%dT%H:%M:%S")),
    ];

    if let Some(realtime) = &report.checks.realtime_tracking.details {
        lines.push("\n⚡ Current Activity:".to_string());
        lines.push(format!("  Active Users: {}", realtime.active_users));
        lines.push(format!("  Events (29min): {}", realtime.total_events));
    }

    if let Some(core) = &report.checks.core_tracking.details {
        let found = core.required_events.len() - core.missing_events.len();
        lines.push("\n📊 Tracking Health:".to_string());
        lines.push(format!("  Events (24h): {}", core.total_events));
        lines.push(format!(
            "  Events Found: {}/{} required",
            found,
            core.required_events.len()
        ));
    }

    if !report.critical_issues.is_empty() {
        lines.push("\n🚨 CRITICAL - Check These:".to_string());
        lines.extend(report.critical_issues.iter().map(|i| format!("  • {}", i)));
    }

    if !report.warning_issues.is_empty() {
        lines.push("\n⚠️  WARNINGS:".to_string());
        lines.extend(report.warning_issues.iter().take(3).map(|i| format!("  • {}", i)));
    }

    if report.overall_status == HealthStatus::Critical {
        lines.push("\n🔍 Troubleshooting:".to_string());
        lines.push("  • Check website traffic (site down?)".to_string());
        lines.push("  • Verify GA4 tracking code deployment".to_string());
        lines.push("  • Review recent code changes".to_string());
    }

    lines.push(rule);
    lines.join("\n")
}

/// Run all checks once and print the summary.
pub async fn run_health_check(source: &dyn ReportSource) -> HealthReport {
    println!("🏥 Running comprehensive analytics health check...\n");

    let checks = checks::run_all(source).await;
    let report = HealthReport::from_checks(checks, Local::now());

    println!("{}", render_summary(&report));
    report
}

/// Single run: check, save the report, alert if configured.
pub async fn run_once(
    source: &dyn ReportSource,
    output_dir: &Path,
    email: &EmailSettings,
) -> Result<HealthReport> {
    let report = run_health_check(source).await;

    let path = save_report(output_dir, "health-check", &Local::now(), &report)?;
    println!("\n📁 Health report saved: {}", path.display());

    maybe_alert(&mut AlertState::default(), email, &report).await;
    Ok(report)
}

/// Check every `interval` until Ctrl+C.
pub async fn run_continuous(
    source: &dyn ReportSource,
    output_dir: &Path,
    email: &EmailSettings,
    interval: Duration,
) -> Result<()> {
    println!(
        "🔄 Starting continuous monitoring (checking every {} minutes)",
        interval.as_secs() / 60
    );
    println!("Press Ctrl+C to stop\n");

    tokio::select! {
        _ = check_forever(source, output_dir, email, interval) => Ok(()),
        result = tokio::signal::ctrl_c() => {
            result?;
            println!("\n⏹️  Monitoring stopped by user");
            Ok(())
        }
    }
}

async fn check_forever(
    source: &dyn ReportSource,
    output_dir: &Path,
    email: &EmailSettings,
    interval: Duration,
) {
    let mut alerts = AlertState::default();

    loop {
        let report = run_health_check(source).await;

        let delay = match save_report(output_dir, "health-check", &Local::now(), &report) {
            Ok(path) => {
                println!("📁 Health report saved: {}", path.display());
                maybe_alert(&mut alerts, email, &report).await;
                println!(
                    "⏱️  Next check in {} minutes...\n",
                    interval.as_secs() / 60
                );
                interval
            }
            Err(e) => {
                println!("❌ Health check failed: {}", e);
                error!("Health check iteration failed: {:#}", e);
                RETRY_DELAY
            }
        };

        tokio::time::sleep(delay).await;
    }
}

async fn maybe_alert(state: &mut AlertState, email: &EmailSettings, report: &HealthReport) {
    let level = state.evaluate(report);
    if !email.enabled {
        return;
    }

    if let Some(level) = level {
        match alert::send_alert(email, level, report).await {
            Ok(()) => println!("📧 Alert email sent to {}", email.to_emails.join(", ")),
            Err(e) => {
                warn!("Alert email failed: {:#}", e);
                println!("❌ Failed to send alert email: {}", e);
            }
        }
    }
}
