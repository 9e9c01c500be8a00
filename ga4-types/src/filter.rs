//! Dimension filter expressions.
//!
//! GA4 models a filter expression as a proto `oneof`: exactly one of
//! `andGroup`, `orGroup`, `notExpression` or `filter` is set. The
//! constructors here only ever populate one field.

use serde::{Deserialize, Serialize};

/// A (possibly compound) filter over dimension values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub and_group: Option<FilterExpressionList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub or_group: Option<FilterExpressionList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_expression: Option<Box<FilterExpression>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

/// A list of expressions combined by `andGroup` / `orGroup`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterExpressionList {
    pub expressions: Vec<FilterExpression>,
}

/// A filter on a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_filter: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_list_filter: Option<InListFilter>,
}

/// Match a field against a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    pub match_type: StringMatchType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

/// Match a field against any of a list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InListFilter {
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

/// How a [`StringFilter`] compares values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StringMatchType {
    Exact,
    BeginsWith,
    EndsWith,
    Contains,
    FullRegexp,
    PartialRegexp,
}

impl FilterExpression {
    /// Filter on a single string comparison.
    pub fn string(
        field: impl Into<String>,
        match_type: StringMatchType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            filter: Some(Filter {
                field_name: field.into(),
                string_filter: Some(StringFilter {
                    match_type,
                    value: value.into(),
                    case_sensitive: None,
                }),
                in_list_filter: None,
            }),
            ..Default::default()
        }
    }

    /// `field` exactly equals `value`.
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::string(field, StringMatchType::Exact, value)
    }

    /// `field` contains `value`.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::string(field, StringMatchType::Contains, value)
    }

    /// `field` partially matches the regular expression `pattern`.
    pub fn partial_regexp(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::string(field, StringMatchType::PartialRegexp, pattern)
    }

    /// `field` is one of `values`.
    pub fn in_list<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: Some(Filter {
                field_name: field.into(),
                string_filter: None,
                in_list_filter: Some(InListFilter {
                    values: values.into_iter().map(Into::into).collect(),
                    case_sensitive: None,
                }),
            }),
            ..Default::default()
        }
    }

    /// `field` exactly matches any of `values`, expressed as an `orGroup` of
    /// exact filters. A single value collapses to a plain filter.
    pub fn any_of_exact<I, S>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expressions: Vec<FilterExpression> =
            values.into_iter().map(|v| Self::exact(field, v)).collect();

        if expressions.len() == 1 {
            return expressions.remove(0);
        }

        Self::or(expressions)
    }

    /// Any of `expressions` matches.
    pub fn or(expressions: Vec<FilterExpression>) -> Self {
        Self {
            or_group: Some(FilterExpressionList { expressions }),
            ..Default::default()
        }
    }

    /// All of `expressions` match.
    pub fn and(expressions: Vec<FilterExpression>) -> Self {
        Self {
            and_group: Some(FilterExpressionList { expressions }),
            ..Default::default()
        }
    }

    /// `expression` does not match.
    pub fn not(expression: FilterExpression) -> Self {
        Self {
            not_expression: Some(Box::new(expression)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_filter_json() {
        let filter = FilterExpression::exact("eventName", "section_engagement");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "filter": {
                    "fieldName": "eventName",
                    "stringFilter": {"matchType": "EXACT", "value": "section_engagement"}
                }
            })
        );
    }

    #[test]
    fn test_any_of_exact_single_value_is_plain_filter() {
        let filter = FilterExpression::any_of_exact("eventName", ["page_view"]);
        assert!(filter.or_group.is_none());
        assert_eq!(filter.filter.unwrap().field_name, "eventName");
    }

    #[test]
    fn test_any_of_exact_builds_or_group() {
        let filter =
            FilterExpression::any_of_exact("eventName", ["view_item", "click_external_deal"]);
        let group = filter.or_group.unwrap();
        assert_eq!(group.expressions.len(), 2);
        assert!(filter.filter.is_none());
    }

    #[test]
    fn test_in_list_filter_json() {
        let filter = FilterExpression::in_list("eventName", ["conversion", "share"]);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "filter": {
                    "fieldName": "eventName",
                    "inListFilter": {"values": ["conversion", "share"]}
                }
            })
        );
    }

    #[test]
    fn test_match_type_names() {
        assert_eq!(
            serde_json::to_value(StringMatchType::PartialRegexp).unwrap(),
            json!("PARTIAL_REGEXP")
        );
        assert_eq!(
            serde_json::to_value(StringMatchType::BeginsWith).unwrap(),
            json!("BEGINS_WITH")
        );
    }
}
