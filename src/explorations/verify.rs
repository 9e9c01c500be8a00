//! Readiness check for the engagement analytics setup.

use std::path::{Path, PathBuf};

use ga4_types::PropertyId;

use super::templates::expected_files;
use crate::config::Settings;
use crate::display::rule;

/// One file that should exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub description: String,
    pub path: PathBuf,
    pub present: bool,
}

impl FileCheck {
    pub fn new(path: impl Into<PathBuf>, description: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            present: path.exists(),
            description: description.into(),
            path,
        }
    }

    pub fn line(&self) -> String {
        let mark = if self.present { "✅" } else { "❌" };
        format!("{} {}", mark, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub templates: Vec<FileCheck>,
    pub implementation: Vec<FileCheck>,
}

impl Verification {
    pub fn templates_ok(&self) -> bool {
        self.templates.iter().all(|c| c.present)
    }

    pub fn implementation_ok(&self) -> bool {
        self.implementation.iter().all(|c| c.present)
    }

    pub fn ready(&self) -> bool {
        self.templates_ok() && self.implementation_ok()
    }
}

/// Check the template files and the site files tracking depends on.
pub fn verify(settings: &Settings) -> Verification {
    verify_paths(
        &settings.templates_dir,
        &settings.site_root,
        &settings.credentials_path,
        &settings.env_file,
    )
}

pub fn verify_paths(
    templates_dir: &Path,
    site_root: &Path,
    credentials: &Path,
    env_file: &Path,
) -> Verification {
    let templates = expected_files()
        .into_iter()
        .map(|(name, description)| FileCheck::new(templates_dir.join(name), description))
        .collect();

    let implementation = vec![
        FileCheck::new(
            site_root.join("src/lib/analytics.ts"),
            "Analytics library with engagement tracking",
        ),
        FileCheck::new(
            site_root.join("pages/deal/[slug].tsx"),
            "Deal page with engagement handlers",
        ),
        FileCheck::new(credentials, "GA4 API credentials"),
        FileCheck::new(env_file, "Analytics environment variables"),
    ];

    Verification {
        templates,
        implementation,
    }
}

fn section(title: &str) -> String {
    format!("\n{}\n{}", title, rule(40))
}

pub fn render(
    verification: &Verification,
    templates_dir: &Path,
    property: Option<&PropertyId>,
) -> String {
    let mut lines = vec![
        "🔍 PRTD GA4 EXPLORATION SETUP VERIFICATION".to_string(),
        rule(60),
    ];

    lines.push(section("📋 EXPLORATION TEMPLATES"));
    lines.extend(verification.templates.iter().map(FileCheck::line));

    lines.push(section("📊 ANALYTICS IMPLEMENTATION"));
    lines.extend(verification.implementation.iter().map(FileCheck::line));

    lines.push(section("📋 OVERALL STATUS"));
    if !verification.ready() {
        lines.push("⚠️  Some components are missing:".to_string());
        if !verification.templates_ok() {
            lines.push("   - Exploration templates need regeneration (prtd-analytics explorations)".to_string());
        }
        if !verification.implementation_ok() {
            lines.push("   - Analytics implementation incomplete".to_string());
        }
        lines.push(String::new());
        lines.push("💡 Run the setup commands again to fix missing components".to_string());
        return lines.join("\n");
    }

    lines.push("🎉 ✅ ALL SYSTEMS READY!".to_string());
    lines.push("Your content engagement analytics setup is complete.".to_string());

    lines.push(section("🚀 QUICK START GUIDE"));
    lines.push("1. 📊 Check current data:\n   prtd-analytics engagement".to_string());
    lines.push(
        "2. 🎯 Set up GA4 explorations:\n   prtd-analytics guide\n   (Interactive 10-15 minute guided setup)"
            .to_string(),
    );
    match property {
        Some(property) => lines.push(format!(
            "3. 🌐 Direct GA4 links:\n   Explore: {}\n   Reports: {}",
            property.explore_url(),
            property.reports_url()
        )),
        None => lines.push("3. 🌐 Direct GA4 links: set GA4_PROPERTY_ID to show them".to_string()),
    }
    lines.push(format!(
        "4. 📚 Manual setup guide:\n   {}",
        templates_dir.join(super::templates::SETUP_GUIDE_FILE).display()
    ));
    lines.push(
        "5. 🔄 Monitor progress:\n   prtd-analytics health    # Overall system health\n   prtd-analytics validate  # Detailed analytics validation"
            .to_string(),
    );

    lines.push(section("💡 NEXT STEPS"));
    lines.push("📈 Generate Test Data:".to_string());
    for step in [
        "Visit deal pages on your site",
        "Hover over images",
        "Select/highlight text",
        "Click share buttons",
        "Scroll through content sections",
    ] {
        lines.push(format!("   • {}", step));
    }
    lines.push("\n⏰ Wait for Data:".to_string());
    lines.push("   • GA4 data appears in 24-48 hours".to_string());
    lines.push("   • Real-time data available immediately".to_string());
    lines.push("   • Run 'prtd-analytics engagement' to check status".to_string());

    lines.join("\n")
}

/// The `verify` command. Missing pieces are reported, not treated as errors.
pub fn run_verify(settings: &Settings) -> Verification {
    let verification = verify(settings);
    println!(
        "{}",
        render(&verification, &settings.templates_dir, settings.property().as_ref())
    );
    verification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailSettings;
    use crate::explorations::templates::write_templates;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_missing_everything() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let v = verify_paths(
            &root.join("templates"),
            root,
            &root.join("creds.json"),
            &root.join(".env.local"),
        );

        assert_eq!(v.templates.len(), 6);
        assert!(!v.templates_ok());
        assert!(!v.ready());

        let out = render(&v, &root.join("templates"), None);
        assert!(out.contains("❌ Manual setup guide"));
        assert!(out.contains("Exploration templates need regeneration"));
        assert!(!out.contains("ALL SYSTEMS READY"));
    }

    #[test]
    fn test_ready_after_setup() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let templates = root.join("templates");
        let property = PropertyId::new("9");

        write_templates(&templates, &property).unwrap();
        touch(&root.join("src/lib/analytics.ts"));
        touch(&root.join("pages/deal/[slug].tsx"));
        touch(&root.join("creds.json"));
        touch(&root.join(".env.local"));

        let v = verify_paths(
            &templates,
            root,
            &root.join("creds.json"),
            &root.join(".env.local"),
        );
        assert!(v.ready());

        let out = render(&v, &templates, Some(&property));
        assert!(out.contains("✅ Content Engagement Overview template"));
        assert!(out.contains("🎉 ✅ ALL SYSTEMS READY!"));
        assert!(out.contains("Explore: https://analytics.google.com/analytics/web/#/p9/explore"));
    }

    #[test]
    fn test_run_verify_on_empty_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let settings = Settings {
            property_id: None,
            credentials_path: root.join("creds.json"),
            output_dir: root.to_path_buf(),
            templates_dir: root.join("templates"),
            site_root: root.to_path_buf(),
            env_file: root.join(".env.local"),
            request_timeout_secs: 30,
            email: EmailSettings::default(),
        };

        let v = run_verify(&settings);
        assert!(!v.ready());
        assert!(v.implementation.iter().all(|c| !c.present));
    }
}
