//! Report responses from the Data API.
//!
//! Both `runReport` and `runRealtimeReport` return the same row layout:
//! dimension values in request order, then metric values in request order,
//! all encoded as strings.

use serde::{Deserialize, Serialize};

/// Response body shared by `runReport` and `runRealtimeReport`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(default)]
    pub dimension_headers: Vec<DimensionHeader>,
    #[serde(default)]
    pub metric_headers: Vec<MetricHeader>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub row_count: Option<u64>,
}

impl ReportResponse {
    /// Returns true if the report contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first row, if any. Reports without dimensions return a single
    /// totals row.
    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DimensionHeader {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricHeader {
    pub name: String,
    #[serde(default, rename = "type")]
    pub metric_type: Option<String>,
}

/// A single report row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub dimension_values: Vec<Value>,
    #[serde(default)]
    pub metric_values: Vec<Value>,
}

/// A dimension or metric cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Value {
    #[serde(default)]
    pub value: String,
}

impl Row {
    /// Build a row from raw cell strings.
    pub fn new<D, M>(dimensions: D, metrics: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimension_values: dimensions
                .into_iter()
                .map(|v| Value { value: v.into() })
                .collect(),
            metric_values: metrics
                .into_iter()
                .map(|v| Value { value: v.into() })
                .collect(),
        }
    }

    /// Dimension value at `index`; missing cells read as the empty string.
    pub fn dimension(&self, index: usize) -> &str {
        self.dimension_values
            .get(index)
            .map(|v| v.value.as_str())
            .unwrap_or("")
    }

    /// Dimension value at `index`, or `default` when empty or missing.
    pub fn dimension_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        match self.dimension(index) {
            "" => default,
            value => value,
        }
    }

    /// Raw metric string at `index`.
    pub fn metric(&self, index: usize) -> &str {
        self.metric_values
            .get(index)
            .map(|v| v.value.as_str())
            .unwrap_or("")
    }

    /// Integer metric at `index`. Fractional values are truncated; missing or
    /// unparseable cells read as zero.
    pub fn metric_u64(&self, index: usize) -> u64 {
        let raw = self.metric(index).trim();
        raw.parse::<u64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().map(|f| f.max(0.0) as u64))
            .unwrap_or(0)
    }

    /// Floating-point metric at `index`; missing or unparseable cells read as zero.
    pub fn metric_f64(&self, index: usize) -> f64 {
        self.metric(index).trim().parse().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_report() {
        let json = r#"{
            "dimensionHeaders": [{"name": "eventName"}],
            "metricHeaders": [{"name": "eventCount", "type": "TYPE_INTEGER"}],
            "rows": [
                {"dimensionValues": [{"value": "page_view"}], "metricValues": [{"value": "120"}]},
                {"dimensionValues": [{"value": "scroll"}], "metricValues": [{"value": "33"}]}
            ],
            "rowCount": 2,
            "kind": "analyticsData#runReport"
        }"#;

        let response: ReportResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.row_count, Some(2));
        assert_eq!(response.rows[0].dimension(0), "page_view");
        assert_eq!(response.rows[0].metric_u64(0), 120);
        assert_eq!(
            response.metric_headers[0].metric_type.as_deref(),
            Some("TYPE_INTEGER")
        );
    }

    #[test]
    fn test_empty_report_has_no_rows_field() {
        let response: ReportResponse =
            serde_json::from_str(r#"{"kind": "analyticsData#runReport"}"#).unwrap();
        assert!(response.is_empty());
        assert!(response.first_row().is_none());
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::new(["", "deal-1"], ["12.7", "oops", "3.5"]);
        assert_eq!(row.dimension_or(0, "unknown"), "unknown");
        assert_eq!(row.dimension_or(1, "unknown"), "deal-1");
        assert_eq!(row.dimension(5), "");
        assert_eq!(row.metric_u64(0), 12);
        assert_eq!(row.metric_u64(1), 0);
        assert_eq!(row.metric_u64(9), 0);
        assert!((row.metric_f64(2) - 3.5).abs() < f64::EPSILON);
    }
}
