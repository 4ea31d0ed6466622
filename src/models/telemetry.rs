use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paginated telemetry listing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub items: Vec<T>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub service_name: String,
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub trace_id: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub id: u64,
    pub service_name: String,
    pub metric_name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub timestamp: String,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TraceSpan {
    pub id: u64,
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub service_name: String,
    pub operation: String,
    /// Milliseconds.
    pub duration: f64,
    pub timestamp: String,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: u64,
    pub service_name: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
    pub severity: String,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogStatistics {
    pub total_logs: u64,
    pub error_count: u64,
    pub warning_count: u64,
    pub info_count: u64,
    pub debug_count: u64,
    /// Percentage.
    pub error_rate: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LatencyStatistics {
    pub count: u64,
    pub avg_latency: f64,
    pub p50_latency: f64,
    pub p95_latency: f64,
    pub p99_latency: f64,
    pub max_latency: f64,
    pub min_latency: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MetricStatistics {
    pub count: u64,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    pub stddev: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventStatistics {
    pub total_events: u64,
    #[serde(default)]
    pub by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_severity: BTreeMap<String, u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServiceList {
    pub services: Vec<String>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_page_parsing() {
        let body = r#"{
            "total": 250,
            "skip": 0,
            "limit": 2,
            "items": [
                {"id": 1, "service_name": "api", "timestamp": "2024-05-01T10:00:00", "level": "ERROR",
                 "message": "boom", "trace_id": "abc", "created_at": "2024-05-01T10:00:01"},
                {"id": 2, "service_name": "api", "timestamp": "2024-05-01T10:00:02", "level": "INFO",
                 "message": "ok", "created_at": "2024-05-01T10:00:03"}
            ]
        }"#;
        let page: Page<LogEntry> = serde_json::from_str(body).unwrap();

        assert_eq!(page.total, 250);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].trace_id.as_deref(), Some("abc"));
        assert_eq!(page.items[1].trace_id, None);
    }

    #[test]
    fn test_event_type_field() {
        let body = r#"{"id": 9, "service_name": "db", "timestamp": "t", "type": "deployment",
                       "details": "v2", "severity": "high"}"#;
        let event: Event = serde_json::from_str(body).unwrap();
        assert_eq!(event.kind, "deployment");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "deployment");
    }

    #[test]
    fn test_event_statistics_defaults() {
        let stats: EventStatistics = serde_json::from_str(r#"{"total_events": 0}"#).unwrap();
        assert!(stats.by_type.is_empty());
        assert!(stats.by_severity.is_empty());
    }
}
