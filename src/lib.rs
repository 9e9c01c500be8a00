//! # prtd-analytics
//!
//! Command-line tools for the GA4 property behind PRTD deal pages: custom
//! dimension setup, tracking validation, realtime monitoring, scheduled
//! health checks with email alerts, console views over recent tracking data
//! and exploration templates for the GA4 UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         prtd-analytics                           │
//! │                                                                  │
//! │  validate  monitor  health  viewers  dimensions  explorations    │
//! │      │        │        │       │          │                      │
//! │      └────────┴────┬───┴───────┘          │                      │
//! │                    ▼                      ▼                      │
//! │              ReportSource           DimensionAdmin               │
//! │                    │                      │                      │
//! │                    └──────────┬───────────┘                      │
//! │                               ▼                                  │
//! │                 PropertyClient (ga4-client)                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`ReportSource`] and [`DimensionAdmin`] seams, with
//!   a GA4-backed implementation and [`StaticSource`] for canned responses
//! - **[`data`]**: folding report rows into counts, funnels and realtime
//!   activity
//! - **[`health`]**: scored health checks, the overall report and alerting
//! - **[`validate`]**, **[`monitor`]**, **[`viewers`]**, **[`dimensions`]**,
//!   **[`explorations`]**: one module per command
//! - **[`config`]**: layered settings (defaults, TOML file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! export GA4_PROPERTY_ID=502239171
//! export GOOGLE_APPLICATION_CREDENTIALS=/path/to/service-account.json
//!
//! prtd-analytics dimensions          # register custom dimensions
//! prtd-analytics validate            # run the validation suite
//! prtd-analytics monitor 30 30       # watch realtime data for 30 minutes
//! prtd-analytics health continuous   # hourly health checks
//! ```
//!
//! ### As a library against canned data
//!
//! ```
//! use ga4_types::{ReportResponse, Row};
//! use prtd_analytics::{health, StaticSource};
//!
//! # tokio_test::block_on(async {
//! let source = StaticSource::new("123").with_report(Ok(ReportResponse {
//!     rows: vec![Row::new(["page_view"], ["42"])],
//!     ..Default::default()
//! }));
//!
//! let report = health::command::run_health_check(&source).await;
//! assert!(report.overall_score < 100.0);
//! # });
//! ```
//!
//! ### Against the live API
//!
//! ```no_run
//! use ga4_client::{Ga4Client, Scope};
//! use prtd_analytics::{validate, PropertyClient};
//!
//! # tokio_test::block_on(async {
//! let client = Ga4Client::builder()
//!     .credentials_file("/path/to/service-account.json")
//!     .scopes([Scope::AnalyticsReadonly])
//!     .build()
//!     .unwrap();
//! let source = PropertyClient::new(client, "502239171".into());
//!
//! let report = validate::run_validation(&source).await;
//! println!("{}", validate::render_summary(&report));
//! # });
//! ```

pub mod config;
pub mod data;
pub mod dimensions;
pub mod display;
pub mod explorations;
pub mod health;
pub mod monitor;
pub mod report;
pub mod source;
pub mod validate;
pub mod viewers;

pub use config::{EmailSettings, Settings};
pub use data::{DealActivity, EventCounts, Funnel, RealtimeActivity, Tally};
pub use health::{HealthReport, HealthStatus, Thresholds};
pub use report::Outcome;
pub use source::{DimensionAdmin, PropertyClient, ReportSource, StaticSource};
