//! Read-only console views over the last week of tracking data.
//!
//! Each view is a list of sections. A section issues one report, and either
//! renders its rows or prints the error and moves on to the next section.

pub mod engagement;
pub mod tracking;

use ga4_client::ClientError;
use ga4_types::ReportResponse;

use crate::display::rule;

pub use engagement::run_engagement;
pub use tracking::run_tracking;

/// Section title followed by a rule.
pub fn header(title: &str) -> String {
    format!("\n{}\n{}", title, rule(60))
}

/// Text shown for a section, given what its report returned.
///
/// `subject` names the data in the error line (`Error fetching {subject}`).
pub fn section_body<F>(
    result: Result<ReportResponse, ClientError>,
    subject: &str,
    render: F,
) -> String
where
    F: FnOnce(&ReportResponse) -> String,
{
    match result {
        Ok(report) => render(&report),
        Err(e) => {
            tracing::warn!("Fetching {} failed: {}", subject, e);
            format!("❌ Error fetching {}: {}", subject, e)
        }
    }
}

/// The two-line hint printed when a section has no rows.
pub(crate) fn no_data(what: &str, hint: &str) -> String {
    format!("ℹ️  {}\n💡 {}", what, hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_body_error() {
        let out = section_body(Err(ClientError::Timeout), "current events", |_| {
            unreachable!()
        });
        assert_eq!(out, "❌ Error fetching current events: Request timed out");
    }

    #[test]
    fn test_header() {
        assert_eq!(header("T"), format!("\nT\n{}", "=".repeat(60)));
    }
}
