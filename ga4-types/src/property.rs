//! GA4 property identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a GA4 property, kept as a string as the APIs do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Wrap a property id. A leading `properties/` prefix is stripped.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        match id.strip_prefix("properties/") {
            Some(bare) => Self(bare.to_string()),
            None => Self(id),
        }
    }

    /// The bare id, e.g. `502239171`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The API resource name, e.g. `properties/502239171`.
    pub fn resource_name(&self) -> String {
        format!("properties/{}", self.0)
    }

    /// Link to the property's home report in the GA4 web UI.
    pub fn home_url(&self) -> String {
        format!(
            "https://analytics.google.com/analytics/web/#/p{}/reports/intelligenthome",
            self.0
        )
    }

    /// Link to the Explore hub in the GA4 web UI.
    pub fn explore_url(&self) -> String {
        format!("https://analytics.google.com/analytics/web/#/p{}/explore", self.0)
    }

    /// Link to the Reports section in the GA4 web UI.
    pub fn reports_url(&self) -> String {
        format!("https://analytics.google.com/analytics/web/#/p{}/reports", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PropertyId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name() {
        let id = PropertyId::new("502239171");
        assert_eq!(id.resource_name(), "properties/502239171");
        assert_eq!(id.to_string(), "502239171");
    }

    #[test]
    fn test_strips_resource_prefix() {
        let id = PropertyId::new("properties/42");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_urls() {
        let id = PropertyId::new("7");
        assert!(id.explore_url().ends_with("/#/p7/explore"));
        assert!(id.home_url().ends_with("/#/p7/reports/intelligenthome"));
    }
}
