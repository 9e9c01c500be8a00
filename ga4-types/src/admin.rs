//! Admin API custom dimension resources.

use serde::{Deserialize, Serialize};

/// Scope of a custom dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionScope {
    #[serde(rename = "DIMENSION_SCOPE_UNSPECIFIED")]
    Unspecified,
    Event,
    User,
    Item,
}

impl Default for DimensionScope {
    fn default() -> Self {
        DimensionScope::Event
    }
}

/// A custom dimension registered on a property.
///
/// `name` is the server-assigned resource name
/// (`properties/{id}/customDimensions/{n}`) and is absent when creating.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDimension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parameter_name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope: DimensionScope,
}

impl CustomDimension {
    /// An event-scoped dimension ready to be created.
    pub fn event(
        parameter_name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            parameter_name: parameter_name.into(),
            display_name: display_name.into(),
            description: description.into(),
            scope: DimensionScope::Event,
        }
    }

    /// The report field name for this dimension, e.g. `customEvent:slug`.
    pub fn report_field(&self) -> String {
        let prefix = match self.scope {
            DimensionScope::User => "customUser",
            DimensionScope::Item => "customItem",
            DimensionScope::Event | DimensionScope::Unspecified => "customEvent",
        };
        format!("{}:{}", prefix, self.parameter_name)
    }
}

/// One page of `properties/{id}/customDimensions`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomDimensionsResponse {
    #[serde(default)]
    pub custom_dimensions: Vec<CustomDimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_omits_name() {
        let dim = CustomDimension::event("slug", "Deal Slug", "Deal/page identifier");
        assert_eq!(
            serde_json::to_value(&dim).unwrap(),
            json!({
                "parameterName": "slug",
                "displayName": "Deal Slug",
                "description": "Deal/page identifier",
                "scope": "EVENT"
            })
        );
    }

    #[test]
    fn test_deserialize_list_page() {
        let json = r#"{
            "customDimensions": [{
                "name": "properties/1/customDimensions/9",
                "parameterName": "vendor_id",
                "displayName": "Vendor ID",
                "scope": "EVENT"
            }],
            "nextPageToken": "abc"
        }"#;

        let page: ListCustomDimensionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.custom_dimensions.len(), 1);
        assert_eq!(page.custom_dimensions[0].description, "");
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_report_field() {
        let mut dim = CustomDimension::event("slug", "Deal Slug", "");
        assert_eq!(dim.report_field(), "customEvent:slug");
        dim.scope = DimensionScope::User;
        assert_eq!(dim.report_field(), "customUser:slug");
    }
}
