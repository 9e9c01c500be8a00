//! Timestamped JSON report files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use ga4_client::ClientError;

/// A fetched value or the error that prevented it. Serializes as the
/// value itself or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Done(T),
    Failed { error: String },
}

impl<T> Outcome<T> {
    /// Wrap an API result. Errors read `Failed to {what}: {error}`.
    pub fn from_result(result: Result<T, ClientError>, what: &str) -> Self {
        match result {
            Ok(value) => Outcome::Done(value),
            Err(e) => {
                warn!("Failed to {}: {}", what, e);
                Outcome::Failed {
                    error: format!("Failed to {}: {}", what, e),
                }
            }
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Outcome::Failed {
            error: error.into(),
        }
    }

    pub fn done(&self) -> Option<&T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Failed { error } => Some(error),
        }
    }
}

/// File-name timestamp, e.g. `20240601-093000`.
pub fn file_timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d-%H%M%S").to_string()
}

/// Path of a `{prefix}-{timestamp}.json` report inside `dir`.
pub fn report_path(dir: &Path, prefix: &str, at: &DateTime<Local>) -> PathBuf {
    dir.join(format!("{}-{}.json", prefix, file_timestamp(at)))
}

/// Write `value` as pretty JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Save a timestamped report and return where it went.
pub fn save_report<T: Serialize>(
    dir: &Path,
    prefix: &str,
    at: &DateTime<Local>,
    value: &T,
) -> Result<PathBuf> {
    let path = report_path(dir, prefix, at);
    write_json(&path, value)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_report_path() {
        let at = Local.with_ymd_and_hms(2024, 1, 5, 7, 8, 9).unwrap();
        assert_eq!(
            report_path(Path::new("/tmp/out"), "health-check", &at),
            PathBuf::from("/tmp/out/health-check-20240105-070809.json")
        );
    }

    #[test]
    fn test_save_report_creates_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports");
        let at = Local.with_ymd_and_hms(2024, 1, 5, 7, 8, 9).unwrap();

        let path = save_report(&nested, "analytics-validation", &at, &json!({"ok": true})).unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"ok\": true\n}");
    }

    #[test]
    fn test_outcome_serializes_value_or_error() {
        let ok: Outcome<u32> = Outcome::from_result(Ok(3), "count");
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!(3));

        let failed: Outcome<u32> = Outcome::from_result(Err(ClientError::Timeout), "count");
        assert_eq!(failed.error(), Some("Failed to count: Request timed out"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "Failed to count: Request timed out"})
        );
    }
}
