//! Report source abstraction.
//!
//! Commands never talk to the GA4 client directly. They ask a
//! [`ReportSource`] for reports, which lets the scoring and aggregation logic
//! run against canned responses in tests.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Mutex;

use async_trait::async_trait;

use ga4_client::{ClientError, Ga4Client};
use ga4_types::{
    CustomDimension, PropertyId, ReportResponse, RunRealtimeReportRequest, RunReportRequest,
};

/// Something that can answer GA4 report requests for one property.
#[async_trait]
pub trait ReportSource: Send + Sync + Debug {
    async fn run_report(&self, request: &RunReportRequest) -> Result<ReportResponse, ClientError>;

    async fn run_realtime_report(
        &self,
        request: &RunRealtimeReportRequest,
    ) -> Result<ReportResponse, ClientError>;

    /// The property the reports are about.
    fn property(&self) -> &PropertyId;
}

/// Custom dimension management for one property.
#[async_trait]
pub trait DimensionAdmin: Send + Sync + Debug {
    async fn list_custom_dimensions(&self) -> Result<Vec<CustomDimension>, ClientError>;

    async fn create_custom_dimension(
        &self,
        dimension: &CustomDimension,
    ) -> Result<CustomDimension, ClientError>;
}

/// A [`Ga4Client`] bound to a single property.
#[derive(Debug, Clone)]
pub struct PropertyClient {
    client: Ga4Client,
    property: PropertyId,
}

impl PropertyClient {
    pub fn new(client: Ga4Client, property: PropertyId) -> Self {
        Self { client, property }
    }

    pub fn client(&self) -> &Ga4Client {
        &self.client
    }
}

#[async_trait]
impl ReportSource for PropertyClient {
    async fn run_report(&self, request: &RunReportRequest) -> Result<ReportResponse, ClientError> {
        self.client.run_report(&self.property, request).await
    }

    async fn run_realtime_report(
        &self,
        request: &RunRealtimeReportRequest,
    ) -> Result<ReportResponse, ClientError> {
        self.client.run_realtime_report(&self.property, request).await
    }

    fn property(&self) -> &PropertyId {
        &self.property
    }
}

#[async_trait]
impl DimensionAdmin for PropertyClient {
    async fn list_custom_dimensions(&self) -> Result<Vec<CustomDimension>, ClientError> {
        self.client.list_custom_dimensions(&self.property).await
    }

    async fn create_custom_dimension(
        &self,
        dimension: &CustomDimension,
    ) -> Result<CustomDimension, ClientError> {
        self.client
            .create_custom_dimension(&self.property, dimension)
            .await
    }
}

/// A source that replays canned responses in call order.
///
/// Standard and realtime reports are queued separately. Once a queue runs
/// dry every further call returns an empty report.
///
/// # Example
///
/// ```
/// use ga4_types::{ReportResponse, Row};
/// use prtd_analytics::StaticSource;
///
/// let source = StaticSource::new("123")
///     .with_report(Ok(ReportResponse {
///         rows: vec![Row::new(["page_view"], ["42"])],
///         ..Default::default()
///     }));
/// ```
#[derive(Debug)]
pub struct StaticSource {
    property: PropertyId,
    reports: Mutex<VecDeque<Result<ReportResponse, ClientError>>>,
    realtime: Mutex<VecDeque<Result<ReportResponse, ClientError>>>,
}

impl StaticSource {
    pub fn new(property: impl Into<PropertyId>) -> Self {
        Self {
            property: property.into(),
            reports: Mutex::new(VecDeque::new()),
            realtime: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue the next `runReport` result.
    pub fn with_report(self, response: Result<ReportResponse, ClientError>) -> Self {
        push(&self.reports, response);
        self
    }

    /// Queue the next `runRealtimeReport` result.
    pub fn with_realtime(self, response: Result<ReportResponse, ClientError>) -> Self {
        push(&self.realtime, response);
        self
    }
}

fn push(
    queue: &Mutex<VecDeque<Result<ReportResponse, ClientError>>>,
    response: Result<ReportResponse, ClientError>,
) {
    if let Ok(mut queue) = queue.lock() {
        queue.push_back(response);
    }
}

fn pop(
    queue: &Mutex<VecDeque<Result<ReportResponse, ClientError>>>,
) -> Result<ReportResponse, ClientError> {
    queue
        .lock()
        .ok()
        .and_then(|mut queue| queue.pop_front())
        .unwrap_or_else(|| Ok(ReportResponse::default()))
}

#[async_trait]
impl ReportSource for StaticSource {
    async fn run_report(&self, _request: &RunReportRequest) -> Result<ReportResponse, ClientError> {
        pop(&self.reports)
    }

    async fn run_realtime_report(
        &self,
        _request: &RunRealtimeReportRequest,
    ) -> Result<ReportResponse, ClientError> {
        pop(&self.realtime)
    }

    fn property(&self) -> &PropertyId {
        &self.property
    }
}
