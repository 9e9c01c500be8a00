//! Aggregation of GA4 report rows.
//!
//! Reports come back as flat rows of string cells. This module folds them
//! into the shapes the commands reason about.
//!
//! ## Submodules
//!
//! - [`tally`]: keyed counters ([`Tally`], [`EventCounts`])
//! - [`funnel`]: view → select → click rates ([`Funnel`])
//! - [`realtime`]: site-wide and per-deal realtime activity
//!
//! ## Data Flow
//!
//! ```text
//! ReportResponse (rows of strings)
//!        │
//!        ▼
//! Tally::from_rows / RealtimeActivity::from_rows / DealActivity::from_rows
//!        │
//!        ├──▶ health checks (scores, issues)
//!        ├──▶ validation results
//!        └──▶ console views
//! ```

pub mod funnel;
pub mod realtime;
pub mod tally;

pub use funnel::{EventStats, Funnel};
pub use realtime::{Conversion, DealActivity, DealSummary, RealtimeActivity, CONVERSION_EVENTS};
pub use tally::{EventCounts, Tally};

/// Whether a dimension value carries data. GA4 reports missing custom
/// parameters as `(not set)`.
pub fn is_set(value: &str) -> bool {
    !value.is_empty() && value != "(not set)"
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Round to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
