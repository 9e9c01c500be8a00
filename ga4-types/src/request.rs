//! Report requests for the Data API.

use serde::{Deserialize, Serialize};

use crate::FilterExpression;

/// A dimension to group report rows by, e.g. `eventName` or `customEvent:slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A metric to aggregate per row, e.g. `eventCount` or `activeUsers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An inclusive date range in GA4 date syntax (`YYYY-MM-DD`, `today`,
/// `yesterday` or `NdaysAgo`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// `{days}daysAgo` through `today`.
    pub fn days_ago(days: u32) -> Self {
        Self::new(format!("{}daysAgo", days), "today")
    }

    /// `yesterday` through `today`.
    pub fn yesterday_to_today() -> Self {
        Self::new("yesterday", "today")
    }
}

/// A window of minutes for real-time reports. GA4 allows at most the last
/// 29 minutes on standard properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRange {
    pub start_minutes_ago: u32,
    pub end_minutes_ago: u32,
}

impl MinuteRange {
    /// The last `minutes` minutes, ending now.
    pub fn last(minutes: u32) -> Self {
        Self {
            start_minutes_ago: minutes,
            end_minutes_ago: 0,
        }
    }
}

/// Body of `properties/{id}:runReport`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_ranges: Vec<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl RunReportRequest {
    /// Create a builder for a report request.
    pub fn builder() -> ReportRequestBuilder {
        ReportRequestBuilder::default()
    }
}

/// Body of `properties/{id}:runRealtimeReport`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRealtimeReportRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub minute_ranges: Vec<MinuteRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl RunRealtimeReportRequest {
    /// Create a builder for a real-time report request.
    pub fn builder() -> RealtimeRequestBuilder {
        RealtimeRequestBuilder::default()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for [`RunReportRequest`].
#[derive(Debug, Default)]
pub struct ReportRequestBuilder {
    request: RunReportRequest,
}

impl ReportRequestBuilder {
    /// Add a dimension.
    pub fn dimension(mut self, name: impl Into<String>) -> Self {
        self.request.dimensions.push(Dimension::new(name));
        self
    }

    /// Add a metric.
    pub fn metric(mut self, name: impl Into<String>) -> Self {
        self.request.metrics.push(Metric::new(name));
        self
    }

    /// Add a date range.
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.request.date_ranges.push(range);
        self
    }

    /// Restrict rows with a dimension filter.
    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.request.dimension_filter = Some(filter);
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.request.limit = Some(limit);
        self
    }

    pub fn build(self) -> RunReportRequest {
        self.request
    }
}

/// Builder for [`RunRealtimeReportRequest`].
#[derive(Debug, Default)]
pub struct RealtimeRequestBuilder {
    request: RunRealtimeReportRequest,
}

impl RealtimeRequestBuilder {
    /// Add a dimension.
    pub fn dimension(mut self, name: impl Into<String>) -> Self {
        self.request.dimensions.push(Dimension::new(name));
        self
    }

    /// Add a metric.
    pub fn metric(mut self, name: impl Into<String>) -> Self {
        self.request.metrics.push(Metric::new(name));
        self
    }

    /// Add a minute range.
    pub fn minute_range(mut self, range: MinuteRange) -> Self {
        self.request.minute_ranges.push(range);
        self
    }

    /// Restrict rows with a dimension filter.
    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.request.dimension_filter = Some(filter);
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.request.limit = Some(limit);
        self
    }

    pub fn build(self) -> RunRealtimeReportRequest {
        self.request
    }
}
