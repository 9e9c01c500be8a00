//! Email alerts for degraded analytics health.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use super::{HealthReport, HealthStatus};
use crate::config::EmailSettings;

/// A warning only alerts if the score dropped by more than this since the
/// previous run.
const WARNING_DROP_POINTS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Critical,
    Warning,
}

impl AlertLevel {
    pub fn subject(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "🚨 CRITICAL: PRTD Analytics Health Alert",
            AlertLevel::Warning => "⚠️ WARNING: PRTD Analytics Health Alert",
        }
    }
}

/// Remembers the previous overall score between runs.
#[derive(Debug, Clone)]
pub struct AlertState {
    last_score: f64,
}

impl Default for AlertState {
    fn default() -> Self {
        Self { last_score: 100.0 }
    }
}

impl AlertState {
    /// Decide whether `report` warrants an alert, then remember its score.
    pub fn evaluate(&mut self, report: &HealthReport) -> Option<AlertLevel> {
        let level = match report.overall_status {
            HealthStatus::Critical => Some(AlertLevel::Critical),
            HealthStatus::Warning
                if report.overall_score < self.last_score - WARNING_DROP_POINTS =>
            {
                Some(AlertLevel::Warning)
            }
            _ => None,
        };

        self.last_score = report.overall_score;
        level
    }

    pub fn last_score(&self) -> f64 {
        self.last_score
    }
}

fn bullets<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let lines: Vec<String> = items.map(|item| format!("• {}", item)).collect();
    if lines.is_empty() {
        "None".to_string()
    } else {
        lines.join("\n")
    }
}

/// Plain-text alert body.
pub fn compose_body(report: &HealthReport) -> String {
    format!(
        "PRTD Analytics Health Alert\n\
         \n\
         Overall Status: {} {}\n\
         Health Score: {:.1}/100\n\
         Timestamp: {}\n\
         \n\
         Critical Issues:\n{}\n\
         \n\
         Warning Issues:\n{}\n\
         \n\
         Recommendations:\n{}\n\
         \n\
         Full report available in the monitoring dashboard.\n",
        report.status_emoji,
        report.overall_status.label(),
        report.overall_score,
        report.timestamp.to_rfc3339(),
        bullets(report.critical_issues.iter()),
        bullets(report.warning_issues.iter().take(5)),
        bullets(report.recommendations.iter().take(5)),
    )
}

/// Build the alert message.
pub fn build_message(
    settings: &EmailSettings,
    level: AlertLevel,
    report: &HealthReport,
) -> Result<Message> {
    let from: Mailbox = settings
        .from_email
        .parse()
        .with_context(|| format!("Invalid from address: {}", settings.from_email))?;

    let mut builder = Message::builder()
        .from(from)
        .subject(level.subject())
        .header(ContentType::TEXT_PLAIN);

    for to in &settings.to_emails {
        let mailbox: Mailbox = to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", to))?;
        builder = builder.to(mailbox);
    }

    Ok(builder.body(compose_body(report))?)
}

/// Send the alert over SMTP with STARTTLS.
pub async fn send_alert(
    settings: &EmailSettings,
    level: AlertLevel,
    report: &HealthReport,
) -> Result<()> {
    if settings.to_emails.is_empty() {
        anyhow::bail!("No alert recipients configured");
    }

    let message = build_message(settings, level, report)?;

    debug!(
        server = %settings.smtp_server,
        port = settings.smtp_port,
        "Connecting to SMTP relay"
    );

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            settings.username.clone(),
            settings.password.clone(),
        ))
        .build();

    mailer.send(message).await.context("SMTP send failed")?;

    info!(recipients = settings.to_emails.len(), "Alert email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::checks::{score_attribution, score_core_tracking, score_funnel, score_realtime};
    use crate::health::{CheckResult, HealthChecks};
    use chrono::{Local, TimeZone};

    fn report_with(scores_failed: bool) -> HealthReport {
        let core = if scores_failed {
            CheckResult::failed("Failed to check core tracking: boom")
        } else {
            score_core_tracking(
                crate::health::checks::REQUIRED_EVENTS
                    .iter()
                    .map(|e| (*e, 5u64))
                    .collect(),
            )
        };

        HealthReport::from_checks(
            HealthChecks {
                core_tracking: core,
                conversion_funnel: score_funnel(&[]),
                realtime_tracking: score_realtime(3, 10),
                partner_attribution: score_attribution(&[]),
            },
            Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_critical_always_alerts() {
        let report = report_with(true);
        assert_eq!(report.overall_status, HealthStatus::Critical);

        let mut state = AlertState::default();
        assert_eq!(state.evaluate(&report), Some(AlertLevel::Critical));
        assert_eq!(state.evaluate(&report), Some(AlertLevel::Critical));
    }

    #[test]
    fn test_warning_alerts_only_on_large_drop() {
        // (100 + 10 + 100 + 10) / 4 = 55
        let report = report_with(false);
        assert_eq!(report.overall_status, HealthStatus::Warning);
        assert_eq!(report.overall_score, 55.0);

        let mut state = AlertState::default();
        assert_eq!(state.evaluate(&report), Some(AlertLevel::Warning));
        assert_eq!(state.last_score(), 55.0);

        // Same score again is not a drop.
        assert_eq!(state.evaluate(&report), None);
    }

    #[test]
    fn test_body_lists_issues() {
        let report = report_with(true);
        let body = compose_body(&report);

        assert!(body.starts_with("PRTD Analytics Health Alert\n"));
        assert!(body.contains("Overall Status: 🔴 CRITICAL"));
        assert!(body.contains("• core_tracking: Failed to check core tracking: boom"));
        assert!(body.contains("Timestamp: 2024-06-01T09:30:00"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let settings = EmailSettings {
            from_email: "not an address".to_string(),
            to_emails: vec!["ops@example.com".to_string()],
            ..Default::default()
        };
        let err = build_message(&settings, AlertLevel::Critical, &report_with(true)).unwrap_err();
        assert!(err.to_string().contains("Invalid from address"));
    }

    #[test]
    fn test_build_message() {
        let settings = EmailSettings {
            from_email: "alerts@example.com".to_string(),
            to_emails: vec!["ops@example.com".to_string(), "dev@example.com".to_string()],
            ..Default::default()
        };
        let message = build_message(&settings, AlertLevel::Warning, &report_with(false)).unwrap();
        assert_eq!(message.envelope().to().len(), 2);
    }
}
