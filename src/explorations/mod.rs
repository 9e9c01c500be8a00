//! GA4 exploration setup.
//!
//! - [`templates`]: JSON templates, the Looker Studio dashboard and the
//!   manual setup guide
//! - [`guide`]: interactive step-by-step walkthrough
//! - [`verify`]: checks that templates and tracking files are in place
//!
//! All three describe the same four explorations, defined once in
//! [`templates::explorations`].

pub mod guide;
pub mod templates;
pub mod verify;

pub use guide::{run_guide, Guide, GuideSummary};
pub use templates::{explorations, run_explorations, write_templates, Exploration};
pub use verify::{run_verify, verify, Verification};
