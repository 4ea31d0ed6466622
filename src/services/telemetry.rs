use async_trait::async_trait;

use crate::api::{ApiClient, ApiResult, QueryParams};
use crate::models::{
    Event, EventStatistics, LatencyStatistics, LogEntry, LogStatistics, MetricPoint,
    MetricStatistics, Page, ServiceList, TraceSpan,
};

const LOGS: &str = "/telemetry/logs";
const METRICS: &str = "/telemetry/metrics";
const TRACES: &str = "/telemetry/traces";
const EVENTS: &str = "/telemetry/events";
const LOG_STATISTICS: &str = "/telemetry/logs/statistics";
const LATENCY_STATISTICS: &str = "/telemetry/latency/statistics";
const METRIC_STATISTICS: &str = "/telemetry/metrics/statistics";
const EVENT_STATISTICS: &str = "/telemetry/events/statistics";
const SERVICES: &str = "/telemetry/services";

pub const DEFAULT_SKIP: u64 = 0;
pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub skip: u64,
    pub limit: u64,
    pub service_name: Option<String>,
    pub level: Option<String>,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            service_name: None,
            level: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFilter {
    pub skip: u64,
    pub limit: u64,
    pub service_name: Option<String>,
    pub metric_name: Option<String>,
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            service_name: None,
            metric_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFilter {
    pub skip: u64,
    pub limit: u64,
    pub service_name: Option<String>,
    pub trace_id: Option<String>,
    pub status: Option<String>,
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            service_name: None,
            trace_id: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub skip: u64,
    pub limit: u64,
    pub service_name: Option<String>,
    pub event_type: Option<String>,
    pub severity: Option<String>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            service_name: None,
            event_type: None,
            severity: None,
        }
    }
}

fn page_query(skip: u64, limit: u64) -> QueryParams {
    QueryParams::new().with("skip", skip).with("limit", limit)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryApi: Send + Sync {
    async fn get_logs(&self, filter: &LogFilter) -> ApiResult<Page<LogEntry>>;
    async fn get_metrics(&self, filter: &MetricFilter) -> ApiResult<Page<MetricPoint>>;
    async fn get_traces(&self, filter: &TraceFilter) -> ApiResult<Page<TraceSpan>>;
    async fn get_events(&self, filter: &EventFilter) -> ApiResult<Page<Event>>;
    async fn get_log_statistics(&self, service_name: Option<String>) -> ApiResult<LogStatistics>;
    async fn get_latency_statistics(
        &self,
        service_name: Option<String>,
        operation: Option<String>,
    ) -> ApiResult<LatencyStatistics>;
    async fn get_metric_statistics(
        &self,
        metric_name: &str,
        service_name: Option<String>,
    ) -> ApiResult<MetricStatistics>;
    async fn get_event_statistics(
        &self,
        service_name: Option<String>,
    ) -> ApiResult<EventStatistics>;
    async fn get_services(&self) -> ApiResult<ServiceList>;
}

#[derive(Clone)]
pub struct TelemetryService {
    client: ApiClient,
}

impl TelemetryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TelemetryApi for TelemetryService {
    #[tracing::instrument(skip(self))]
    async fn get_logs(&self, filter: &LogFilter) -> ApiResult<Page<LogEntry>> {
        let query = page_query(filter.skip, filter.limit)
            .with_opt("service_name", filter.service_name.as_deref())
            .with_opt("level", filter.level.as_deref());
        self.client.get(LOGS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_metrics(&self, filter: &MetricFilter) -> ApiResult<Page<MetricPoint>> {
        let query = page_query(filter.skip, filter.limit)
            .with_opt("service_name", filter.service_name.as_deref())
            .with_opt("metric_name", filter.metric_name.as_deref());
        self.client.get(METRICS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_traces(&self, filter: &TraceFilter) -> ApiResult<Page<TraceSpan>> {
        let query = page_query(filter.skip, filter.limit)
            .with_opt("service_name", filter.service_name.as_deref())
            .with_opt("trace_id", filter.trace_id.as_deref())
            .with_opt("status", filter.status.as_deref());
        self.client.get(TRACES, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_events(&self, filter: &EventFilter) -> ApiResult<Page<Event>> {
        let query = page_query(filter.skip, filter.limit)
            .with_opt("service_name", filter.service_name.as_deref())
            .with_opt("event_type", filter.event_type.as_deref())
            .with_opt("severity", filter.severity.as_deref());
        self.client.get(EVENTS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_log_statistics(&self, service_name: Option<String>) -> ApiResult<LogStatistics> {
        let query = QueryParams::new().with_opt("service_name", service_name);
        self.client.get(LOG_STATISTICS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_latency_statistics(
        &self,
        service_name: Option<String>,
        operation: Option<String>,
    ) -> ApiResult<LatencyStatistics> {
        let query = QueryParams::new()
            .with_opt("service_name", service_name)
            .with_opt("operation", operation);
        self.client.get(LATENCY_STATISTICS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_metric_statistics(
        &self,
        metric_name: &str,
        service_name: Option<String>,
    ) -> ApiResult<MetricStatistics> {
        let query = QueryParams::new()
            .with("metric_name", metric_name)
            .with_opt("service_name", service_name);
        self.client.get(METRIC_STATISTICS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_event_statistics(
        &self,
        service_name: Option<String>,
    ) -> ApiResult<EventStatistics> {
        let query = QueryParams::new().with_opt("service_name", service_name);
        self.client.get(EVENT_STATISTICS, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_services(&self) -> ApiResult<ServiceList> {
        self.client.get(SERVICES, QueryParams::new()).await
    }
}
