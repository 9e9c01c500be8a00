//! Custom dimension setup.
//!
//! Registers the event parameters PRTD pages send so they show up in GA4
//! reports. Creation is idempotent: dimensions that already exist are
//! skipped, either because the listing showed them or because the Admin API
//! answered with a conflict.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use ga4_types::CustomDimension;

use crate::display::rule;
use crate::source::DimensionAdmin;

/// `(parameter, display name, description)` of every PRTD dimension.
pub const PRTD_DIMENSIONS: [(&str, &str, &str); 12] = [
    ("slug", "Deal Slug", "Deal/page identifier for tracking specific content"),
    ("deal_id", "Deal ID", "Unique deal tracking identifier"),
    ("vendor_id", "Vendor ID", "Partner/vendor identifier for attribution"),
    ("category", "Category", "Deal category for performance analysis"),
    ("position", "Position", "Layout position for UX optimization"),
    ("section_version", "Section Version", "A/B test variant identifier"),
    ("src", "Source", "Traffic source detail for attribution"),
    ("cta_id", "CTA ID", "Call-to-action identifier for conversion tracking"),
    ("form_location", "Form Location", "Form context for lead generation analysis"),
    ("status_code", "Status Code", "HTTP/response status codes for error tracking"),
    ("error_code", "Error Code", "Error categorization for debugging"),
    ("request_id", "Request ID", "Debug trace identifier for request correlation"),
];

/// The PRTD dimensions as create requests.
pub fn prtd_dimensions() -> Vec<CustomDimension> {
    PRTD_DIMENSIONS
        .iter()
        .map(|(param, display, description)| CustomDimension::event(*param, *display, *description))
        .collect()
}

/// What happened to one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SetupOutcome {
    Created,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetupSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl SetupSummary {
    fn record(&mut self, outcome: &SetupOutcome) {
        match outcome {
            SetupOutcome::Created => self.created += 1,
            SetupOutcome::Skipped => self.skipped += 1,
            SetupOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.created + self.skipped + self.failed
    }

    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Create one dimension unless `existing` already has its parameter.
pub async fn ensure_dimension(
    admin: &dyn DimensionAdmin,
    existing: &BTreeSet<String>,
    dimension: &CustomDimension,
) -> SetupOutcome {
    if existing.contains(&dimension.parameter_name) {
        println!("⚠️  Skipped: {} (already exists)", dimension.display_name);
        return SetupOutcome::Skipped;
    }

    match admin.create_custom_dimension(dimension).await {
        Ok(_) => {
            println!(
                "✅ Created: {} ({})",
                dimension.display_name, dimension.parameter_name
            );
            SetupOutcome::Created
        }
        Err(e) if e.is_already_exists() => {
            println!("⚠️  Skipped: {} (already exists)", dimension.display_name);
            SetupOutcome::Skipped
        }
        Err(e) => {
            warn!("Creating {} failed: {}", dimension.parameter_name, e);
            println!("❌ Failed to create {}: {}", dimension.display_name, e);
            SetupOutcome::Failed(e.to_string())
        }
    }
}

/// Parameter names already registered. A failed listing counts as none.
async fn existing_parameters(admin: &dyn DimensionAdmin) -> BTreeSet<String> {
    match admin.list_custom_dimensions().await {
        Ok(dimensions) => {
            println!("📋 Found {} existing custom dimensions", dimensions.len());
            dimensions.into_iter().map(|d| d.parameter_name).collect()
        }
        Err(e) => {
            println!("❌ Failed to list existing dimensions: {}", e);
            BTreeSet::new()
        }
    }
}

/// Create every dimension in `dimensions` that is missing.
pub async fn setup_dimensions(
    admin: &dyn DimensionAdmin,
    dimensions: &[CustomDimension],
) -> SetupSummary {
    let existing = existing_parameters(admin).await;
    let mut summary = SetupSummary {
        total: dimensions.len(),
        ..Default::default()
    };

    for dimension in dimensions {
        let outcome = ensure_dimension(admin, &existing, dimension).await;
        summary.record(&outcome);
    }

    info!(
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.failed,
        "Dimension setup finished"
    );
    summary
}

pub fn render_summary(summary: &SetupSummary) -> String {
    let mut lines = vec![
        rule(60),
        "📊 Setup Summary:".to_string(),
        format!("  ✅ Created: {} dimensions", summary.created),
        format!("  ⚠️  Skipped: {} dimensions (already exist)", summary.skipped),
        format!("  ❌ Failed: {} dimensions", summary.failed),
        format!(
            "  📋 Total: {}/{} processed",
            summary.processed(),
            summary.total
        ),
    ];

    if summary.succeeded() {
        lines.push("\n🎉 GA4 custom dimensions setup complete!".to_string());
        lines.push(
            "💡 Tip: Run 'prtd-analytics validate' in 24-48 hours to verify data collection"
                .to_string(),
        );
    } else {
        lines.push("\n⚠️  Some dimensions failed to create. Check error messages above.".to_string());
    }

    lines.join("\n")
}

/// The `dimensions` command. Returns whether every dimension is in place.
pub async fn run_setup(admin: &dyn DimensionAdmin, property_id: &str) -> bool {
    let dimensions = prtd_dimensions();

    println!("🚀 Starting GA4 Custom Dimensions Setup for PRTD");
    println!("Property ID: {}", property_id);
    println!("Dimensions to create: {}", dimensions.len());
    println!("{}", rule(60));

    let summary = setup_dimensions(admin, &dimensions).await;
    println!("{}", render_summary(&summary));
    summary.succeeded()
}

/// The `dimensions --list` command. Returns how many dimensions are active,
/// or `None` if the listing failed.
pub async fn run_list(admin: &dyn DimensionAdmin, property_id: &str) -> Option<usize> {
    println!("📋 GA4 Custom Dimensions for PRTD");
    println!("Property ID: {}", property_id);
    println!("{}", rule(60));

    let dimensions = match admin.list_custom_dimensions().await {
        Ok(dimensions) => dimensions,
        Err(e) => {
            println!("❌ Failed to list dimensions: {}", e);
            return None;
        }
    };

    if dimensions.is_empty() {
        println!("❌ No custom dimensions found");
        return Some(0);
    }

    for (i, dimension) in dimensions.iter().enumerate() {
        println!(
            "{:2}. {} ({})",
            i + 1,
            dimension.display_name,
            dimension.parameter_name
        );
        println!("    {}\n", dimension.description);
    }
    println!("✅ Total: {} custom dimensions active", dimensions.len());
    Some(dimensions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ga4_client::ClientError;
    use std::sync::Mutex;

    /// Admin fake: a fixed listing and a per-parameter create result.
    #[derive(Debug, Default)]
    struct FakeAdmin {
        listed: Vec<CustomDimension>,
        list_fails: bool,
        conflicts: Vec<&'static str>,
        broken: Vec<&'static str>,
        created: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DimensionAdmin for FakeAdmin {
        async fn list_custom_dimensions(&self) -> Result<Vec<CustomDimension>, ClientError> {
            if self.list_fails {
                return Err(ClientError::Timeout);
            }
            Ok(self.listed.clone())
        }

        async fn create_custom_dimension(
            &self,
            dimension: &CustomDimension,
        ) -> Result<CustomDimension, ClientError> {
            let param = dimension.parameter_name.as_str();
            if self.conflicts.contains(&param) {
                return Err(ClientError::from_api_response(
                    409,
                    r#"{"error":{"code":409,"message":"Dimension already exists","status":"ALREADY_EXISTS"}}"#,
                ));
            }
            if self.broken.contains(&param) {
                return Err(ClientError::from_api_response(
                    400,
                    r#"{"error":{"code":400,"message":"Invalid parameter name","status":"INVALID_ARGUMENT"}}"#,
                ));
            }
            self.created.lock().unwrap().push(param.to_string());
            let mut created = dimension.clone();
            created.name = Some(format!("properties/1/customDimensions/{}", param));
            Ok(created)
        }
    }

    #[test]
    fn test_prtd_dimensions() {
        let dims = prtd_dimensions();
        assert_eq!(dims.len(), 12);
        assert_eq!(dims[0].report_field(), "customEvent:slug");

        let unique: BTreeSet<_> = dims.iter().map(|d| d.parameter_name.as_str()).collect();
        assert_eq!(unique.len(), 12);
    }

    #[tokio::test]
    async fn test_setup_creates_missing_only() {
        let admin = FakeAdmin {
            listed: vec![CustomDimension::event("slug", "Deal Slug", "")],
            ..Default::default()
        };

        let summary = setup_dimensions(&admin, &prtd_dimensions()).await;

        assert_eq!(summary.created, 11);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.processed(), 12);
        assert!(summary.succeeded());
        assert!(!admin.created.lock().unwrap().contains(&"slug".to_string()));
    }

    #[tokio::test]
    async fn test_conflict_is_skipped_and_errors_fail() {
        let admin = FakeAdmin {
            list_fails: true,
            conflicts: vec!["deal_id"],
            broken: vec!["src", "cta_id"],
            ..Default::default()
        };

        let summary = setup_dimensions(&admin, &prtd_dimensions()).await;

        assert_eq!(summary.created, 9);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert!(!summary.succeeded());

        let out = render_summary(&summary);
        assert!(out.contains("❌ Failed: 2 dimensions"));
        assert!(out.contains("📋 Total: 12/12 processed"));
        assert!(out.contains("Some dimensions failed"));
    }

    #[tokio::test]
    async fn test_second_run_skips_everything() {
        let admin = FakeAdmin {
            listed: prtd_dimensions(),
            ..Default::default()
        };

        assert!(run_setup(&admin, "1").await);
        assert!(admin.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_reports_failure() {
        let admin = FakeAdmin {
            list_fails: true,
            ..Default::default()
        };
        assert_eq!(run_list(&admin, "1").await, None);

        let empty = FakeAdmin::default();
        assert_eq!(run_list(&empty, "1").await, Some(0));
    }
}
