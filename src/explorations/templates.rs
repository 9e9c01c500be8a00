//! Exploration and dashboard templates.
//!
//! GA4 has no API for saved explorations, so these are written out as JSON
//! for manual import, along with a markdown guide describing how to build
//! each one by hand. Output depends only on the property id.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ga4_types::{Dimension, Metric, PropertyId};

use crate::display::rule;
use crate::report::write_json;

pub const LOOKER_TEMPLATE_FILE: &str = "looker_studio_dashboard.json";
pub const SETUP_GUIDE_FILE: &str = "MANUAL_SETUP_GUIDE.md";

/// How an exploration filter compares the event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperation {
    Exact,
    Contains,
}

impl FilterOperation {
    /// Wording used in the GA4 filter picker.
    pub fn label(&self) -> &'static str {
        match self {
            FilterOperation::Exact => "Exactly matches",
            FilterOperation::Contains => "Contains",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationFilter {
    pub field_name: String,
    pub operation: FilterOperation,
    pub value: String,
}

impl ExplorationFilter {
    /// `Event name exactly matches "x"` / `Event name contains "x"`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} \"{}\"",
            field_label(&self.field_name),
            self.operation.label().to_lowercase(),
            self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDateRange {
    pub start_date: String,
    pub end_date: String,
}

/// Which fields go where in the free-form table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationConfig {
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub filters: Vec<ExplorationFilter>,
    pub date_range: TemplateDateRange,
    pub layout: Layout,
}

/// A saved exploration to be recreated in the GA4 UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub config: ExplorationConfig,
}

impl Exploration {
    fn new(
        name: &str,
        description: &str,
        dimensions: &[&str],
        metrics: &[&str],
        filter: (FilterOperation, &str),
        layout: Layout,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: "EXPLORATION".to_string(),
            config: ExplorationConfig {
                dimensions: dimensions.iter().map(|d| Dimension::new(*d)).collect(),
                metrics: metrics.iter().map(|m| Metric::new(*m)).collect(),
                filters: vec![ExplorationFilter {
                    field_name: "eventName".to_string(),
                    operation: filter.0,
                    value: filter.1.to_string(),
                }],
                date_range: TemplateDateRange {
                    start_date: "30daysAgo".to_string(),
                    end_date: "today".to_string(),
                },
                layout,
            },
        }
    }

    /// Template file name: the lowercased name with spaces as underscores.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name.to_lowercase().replace(' ', "_"))
    }

    /// The name without the `PRTD ` prefix.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("PRTD ").unwrap_or(&self.name)
    }

    pub fn dimension_labels(&self) -> Vec<String> {
        self.config
            .dimensions
            .iter()
            .map(|d| field_label(&d.name))
            .collect()
    }

    pub fn metric_labels(&self) -> Vec<String> {
        self.config
            .metrics
            .iter()
            .map(|m| field_label(&m.name))
            .collect()
    }

    /// The only filter every PRTD exploration has: on the event name.
    pub fn filter(&self) -> Option<&ExplorationFilter> {
        self.config.filters.first()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Human name of a GA4 field as the exploration editor shows it.
pub fn field_label(field: &str) -> String {
    if let Some(param) = field.strip_prefix("customEvent:") {
        return format!("Custom parameter: {}", param);
    }
    match field {
        "eventName" => "Event name",
        "eventCount" => "Event count",
        "totalUsers" => "Total users",
        "averageSessionDuration" => "Average session duration",
        "engagementRate" => "Engagement rate",
        "date" => "Date",
        other => other,
    }
    .to_string()
}

/// The four PRTD engagement explorations.
pub fn explorations() -> Vec<Exploration> {
    vec![
        Exploration::new(
            "PRTD Content Engagement Overview",
            "Comprehensive view of all content interactions across the site",
            &[
                "eventName",
                "customEvent:slug",
                "customEvent:interaction_type",
                "customEvent:content_piece",
                "customEvent:category",
            ],
            &["eventCount", "totalUsers", "averageSessionDuration"],
            (FilterOperation::Exact, "content_engagement"),
            Layout {
                rows: strings(&["eventName", "customEvent:interaction_type"]),
                columns: strings(&["customEvent:content_piece"]),
                values: strings(&["eventCount"]),
            },
        ),
        Exploration::new(
            "PRTD Image Engagement Analysis",
            "Track image interaction patterns and view times",
            &[
                "eventName",
                "customEvent:slug",
                "customEvent:vendor_id",
                "customEvent:category",
            ],
            &["eventCount", "totalUsers", "engagementRate"],
            (FilterOperation::Contains, "image"),
            Layout {
                rows: strings(&["customEvent:slug"]),
                columns: strings(&["eventName"]),
                values: strings(&["eventCount", "totalUsers"]),
            },
        ),
        Exploration::new(
            "PRTD Engagement Quality Dashboard",
            "View engagement scores and quality metrics",
            &[
                "customEvent:slug",
                "customEvent:category",
                "customEvent:vendor_id",
            ],
            &["eventCount", "totalUsers", "engagementRate"],
            (FilterOperation::Exact, "engagement_quality_score"),
            Layout {
                rows: strings(&["customEvent:slug"]),
                columns: strings(&["customEvent:category"]),
                values: strings(&["eventCount", "totalUsers"]),
            },
        ),
        Exploration::new(
            "PRTD Section Performance Analysis",
            "Analyze how users engage with different content sections",
            &[
                "customEvent:slug",
                "customEvent:category",
                "customEvent:cta_id",
            ],
            &["eventCount", "totalUsers", "averageSessionDuration"],
            (FilterOperation::Exact, "section_engagement"),
            Layout {
                rows: strings(&["customEvent:slug"]),
                columns: Vec::new(),
                values: strings(&["eventCount", "totalUsers"]),
            },
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub property_id: String,
    pub credentials: String,
}

/// A Looker Studio chart. Single- and multi-field charts use different keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_dimension: Option<String>,
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Chart {
    fn single(title: &str, kind: &str, dimension: &str, filter: &str) -> Self {
        Self {
            title: title.to_string(),
            kind: kind.to_string(),
            dimension: Some(dimension.to_string()),
            metric: Some("eventCount".to_string()),
            dimensions: None,
            metrics: None,
            secondary_dimension: None,
            filter: filter.to_string(),
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookerDashboard {
    pub title: String,
    pub description: String,
    pub data_source: DataSource,
    pub charts: Vec<Chart>,
}

pub fn looker_dashboard(property: &PropertyId) -> LookerDashboard {
    LookerDashboard {
        title: "PRTD Content Engagement Analytics".to_string(),
        description: "Comprehensive dashboard for content engagement tracking".to_string(),
        data_source: DataSource {
            kind: "GOOGLE_ANALYTICS_4".to_string(),
            property_id: property.to_string(),
            credentials: "oauth".to_string(),
        },
        charts: vec![
            Chart::single(
                "Engagement Quality Distribution",
                "PIE_CHART",
                "customEvent:engagement_quality",
                "eventName == 'engagement_quality_score'",
            ),
            Chart {
                limit: Some(10),
                ..Chart::single(
                    "Top Performing Deals",
                    "BAR_CHART",
                    "customEvent:slug",
                    "eventName == 'content_engagement'",
                )
            },
            Chart {
                title: "Content Interaction Types".to_string(),
                kind: "TABLE".to_string(),
                dimension: None,
                metric: None,
                dimensions: Some(strings(&[
                    "customEvent:interaction_type",
                    "customEvent:content_piece",
                ])),
                metrics: Some(strings(&["eventCount", "totalUsers"])),
                secondary_dimension: None,
                filter: "eventName == 'content_engagement'".to_string(),
                limit: None,
            },
            Chart {
                secondary_dimension: Some("customEvent:slug".to_string()),
                ..Chart::single(
                    "Image Engagement by Deal",
                    "LINE_CHART",
                    "date",
                    "eventName CONTAINS 'image'",
                )
            },
        ],
    }
}

fn section_emoji(index: usize) -> &'static str {
    ["🎯", "🖼️", "🏆", "📄"].get(index).copied().unwrap_or("📊")
}

/// The markdown guide for building each exploration by hand.
pub fn manual_setup_guide(property: &PropertyId) -> String {
    let mut out = String::from("# GA4 Explorations Manual Setup Guide\n\n## Quick Setup Instructions\n\n");
    out.push_str(
        "GA4 has no API for creating saved explorations, so follow these steps to create each exploration manually:\n",
    );

    for (i, exploration) in explorations().iter().enumerate() {
        let layout = &exploration.config.layout;
        let labels = |fields: &[String]| {
            fields
                .iter()
                .map(|f| field_label(f))
                .collect::<Vec<_>>()
                .join(", ")
        };

        out.push_str(&format!(
            "\n### {} Exploration {}: {}\n\n",
            section_emoji(i),
            i + 1,
            exploration.short_name()
        ));
        out.push_str("1. **Go to GA4 → Explore → Blank**\n");
        out.push_str(&format!("2. **Name:** \"{}\"\n", exploration.name));
        out.push_str("3. **Date Range:** Last 30 days\n");
        out.push_str("4. **Add Dimensions:**\n");
        for label in exploration.dimension_labels() {
            out.push_str(&format!("   - {}\n", label));
        }
        out.push_str("\n5. **Add Metrics:**\n");
        for label in exploration.metric_labels() {
            out.push_str(&format!("   - {}\n", label));
        }
        out.push_str("\n6. **Configuration:**\n");
        out.push_str(&format!("   - **Rows:** {}\n", labels(&layout.rows)));
        if !layout.columns.is_empty() {
            out.push_str(&format!("   - **Columns:** {}\n", labels(&layout.columns)));
        }
        out.push_str(&format!("   - **Values:** {}\n", labels(&layout.values)));
        if let Some(filter) = exploration.filter() {
            out.push_str(&format!("   - **Filter:** {}\n", filter.describe()));
        }
    }

    out.push_str(&format!(
        "\n## 🔗 Direct GA4 Links\n\n- **GA4 Property:** {}\n- **Explore Hub:** {}\n",
        property.home_url(),
        property.explore_url()
    ));
    out.push_str(&format!(
        "\n## 📊 Alternative: Use Looker Studio\n\n\
         For more advanced dashboards, import the Looker Studio template:\n\
         1. Go to https://lookerstudio.google.com/\n\
         2. Create new report\n\
         3. Connect to GA4 data source (Property ID: {})\n\
         4. Import the template configuration from {}\n",
        property, LOOKER_TEMPLATE_FILE
    ));
    out
}

/// Write every template and the guide into `dir`. Returns the files written.
pub fn write_templates(dir: &Path, property: &PropertyId) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for exploration in explorations() {
        let path = dir.join(exploration.file_name());
        write_json(&path, &exploration)?;
        written.push(path);
    }

    let path = dir.join(LOOKER_TEMPLATE_FILE);
    write_json(&path, &looker_dashboard(property))?;
    written.push(path);

    let path = dir.join(SETUP_GUIDE_FILE);
    fs::write(&path, manual_setup_guide(property))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    written.push(path);

    Ok(written)
}

/// Every file [`write_templates`] produces, with a description.
pub fn expected_files() -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = explorations()
        .iter()
        .map(|e| (e.file_name(), format!("{} template", e.short_name())))
        .collect();
    files.push((
        LOOKER_TEMPLATE_FILE.to_string(),
        "Looker Studio dashboard template".to_string(),
    ));
    files.push((SETUP_GUIDE_FILE.to_string(), "Manual setup guide".to_string()));
    files
}

/// The `explorations` command.
pub fn run_explorations(dir: &Path, property: &PropertyId) -> Result<()> {
    println!("🚀 GA4 CUSTOM EXPLORATIONS CREATOR FOR PRTD");
    println!("Property ID: {}", property);
    println!("{}", rule(60));

    println!("\n🎯 CREATING GA4 EXPLORATION TEMPLATES");
    println!("{}", rule(60));
    let written = write_templates(dir, property)?;

    for (i, exploration) in explorations().iter().enumerate() {
        println!("✅ Created template {}: {}", i + 1, exploration.name);
        println!("   File: {}", dir.join(exploration.file_name()).display());
        println!("   Description: {}\n", exploration.description);
    }
    println!(
        "✅ Created Looker Studio template: {}",
        dir.join(LOOKER_TEMPLATE_FILE).display()
    );
    println!(
        "✅ Created manual setup guide: {}",
        dir.join(SETUP_GUIDE_FILE).display()
    );
    tracing::info!(files = written.len(), "Exploration templates written");

    println!("\n🎉 EXPLORATION SETUP COMPLETE!");
    println!("{}", rule(60));
    println!("📁 Templates created in: {}", dir.display());
    println!("📋 Manual setup guide: {}", SETUP_GUIDE_FILE);
    println!("📊 Looker Studio template: {}", LOOKER_TEMPLATE_FILE);
    println!("\n⚡ QUICK SETUP:");
    println!("1. Open GA4 → Explore → Blank");
    println!("2. Follow the exact configurations in {}", SETUP_GUIDE_FILE);
    println!("3. Each exploration takes ~2-3 minutes to set up");
    println!("\n🔗 Direct GA4 link:");
    println!("{}", property.explore_url());
    println!("\n💡 Run 'prtd-analytics engagement' to check current data before creating explorations");
    Ok(())
}
