//! # ga4-client
//!
//! A small client for the Google Analytics 4 Data and Admin APIs,
//! authenticated with a service-account key.
//!
//! ## Supported Calls
//!
//! - **runReport** and **runRealtimeReport** on the Data API
//! - **customDimensions** list and create on the Admin API
//!
//! Access tokens are obtained with the OAuth2 JWT bearer grant and cached
//! until shortly before they expire.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ga4_client::{Ga4Client, Scope};
//! use ga4_types::PropertyId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Ga4Client::builder()
//!         .credentials_file("prtd-ga4-credentials.json")
//!         .scopes([Scope::AnalyticsEdit])
//!         .build()?;
//!
//!     let dims = client
//!         .list_custom_dimensions(&PropertyId::new("123456789"))
//!         .await?;
//!     println!("{} custom dimensions", dims.len());
//!     Ok(())
//! }
//! ```

mod client;
pub mod credentials;
pub mod error;

pub use client::{Ga4Client, Ga4ClientBuilder};
pub use credentials::{Scope, ServiceAccountKey, TokenProvider};
pub use error::ClientError;

// Re-export types for convenience
pub use ga4_types::{CustomDimension, PropertyId, ReportResponse, Row};
