//! # ga4-types
//!
//! Wire types for the Google Analytics 4 Data API (`runReport`,
//! `runRealtimeReport`) and the Admin API custom-dimension endpoints.
//!
//! Everything here is plain data: requests serialize to the camelCase JSON the
//! REST endpoints expect, and responses deserialize from what they return.
//! Transport and authentication live in `ga4-client`.
//!
//! ## Example
//!
//! ```rust
//! use ga4_types::{DateRange, FilterExpression, RunReportRequest};
//!
//! let request = RunReportRequest::builder()
//!     .dimension("eventName")
//!     .metric("eventCount")
//!     .metric("totalUsers")
//!     .date_range(DateRange::days_ago(7))
//!     .filter(FilterExpression::exact("eventName", "content_engagement"))
//!     .limit(20)
//!     .build();
//!
//! assert_eq!(request.dimensions.len(), 1);
//! assert_eq!(request.metrics.len(), 2);
//! ```

mod admin;
mod filter;
mod property;
mod request;
mod response;

pub use admin::*;
pub use filter::*;
pub use property::*;
pub use request::*;
pub use response::*;
