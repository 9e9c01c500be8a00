//! Layered configuration.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`prtd-analytics.toml` unless `--config` is given)
//! 3. `PRTD_*` environment variables, nested keys separated by `__`
//!    (e.g. `PRTD_EMAIL__SMTP_SERVER`)
//! 4. the conventional `GA4_PROPERTY_ID` and `GOOGLE_APPLICATION_CREDENTIALS`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use ga4_types::PropertyId;

pub const DEFAULT_CONFIG_FILE: &str = "prtd-analytics.toml";
pub const DEFAULT_CREDENTIALS_PATH: &str = "/home/deploy/prtd-ga4-credentials.json";

/// Application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub property_id: Option<String>,
    pub credentials_path: PathBuf,
    /// Where timestamped JSON reports are written.
    pub output_dir: PathBuf,
    /// Where exploration templates and the setup guide are written.
    pub templates_dir: PathBuf,
    /// Root of the web site checked by `verify`.
    pub site_root: PathBuf,
    /// Environment file checked by `verify`.
    pub env_file: PathBuf,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub email: EmailSettings,
}

/// SMTP settings for health alerts.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub to_emails: Vec<String>,
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
            to_emails: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the given file (if any) and the environment.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if required && !file.exists() {
            bail!("Config file not found: {}", file.display());
        }

        let config = Config::builder()
            .set_default("credentials_path", DEFAULT_CREDENTIALS_PATH)?
            .set_default("output_dir", ".")?
            .set_default("templates_dir", "ga4-exploration-templates")?
            .set_default("site_root", ".")?
            .set_default("env_file", ".env.local")?
            .set_default("request_timeout_secs", 30)?
            .add_source(File::from(file).required(required))
            .add_source(
                Environment::with_prefix("PRTD")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("email.to_emails")
                    .try_parsing(true),
            )
            .set_override_option("property_id", std::env::var("GA4_PROPERTY_ID").ok())?
            .set_override_option(
                "credentials_path",
                std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok(),
            )?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// The configured GA4 property, if any.
    pub fn property(&self) -> Option<PropertyId> {
        self.property_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PropertyId::new)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
