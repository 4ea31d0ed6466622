use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
    #[serde(other)]
    Unknown,
}

/// Health snapshot of one service over the requested window.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServiceHealth {
    pub service_id: u64,
    pub service_name: String,
    pub version: Option<String>,
    pub status: HealthStatus,
    /// 1 (healthy) to 3 (critical).
    pub severity_score: u8,
    /// Percentage of error logs.
    pub error_rate: f64,
    /// Milliseconds.
    pub avg_latency: f64,
    pub error_count: u64,
    pub total_logs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServiceHealthList {
    pub data: Vec<ServiceHealth>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct IncidentVolumePoint {
    pub timestamp: String,
    pub incident_count: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct IncidentVolume {
    pub service_name: String,
    pub time_range_hours: u32,
    #[serde(default)]
    pub data_points: Vec<IncidentVolumePoint>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CriticalServices {
    pub services: Vec<ServiceHealth>,
    pub count: usize,
    pub timestamp: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventCorrelation {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CorrelationDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub error_count: u64,
    pub event_count: Option<u64>,
    pub slow_trace_count: Option<u64>,
    pub confidence: f64,
    pub events: Option<Vec<EventCorrelation>>,
    pub avg_slow_duration: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AiPrediction {
    pub root_cause: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

/// Root-cause analysis computed by the backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CorrelationAnalysis {
    pub service_name: String,
    pub time_range_hours: u32,
    pub error_logs_count: u64,
    pub events_count: u64,
    pub slow_traces_count: u64,
    #[serde(default)]
    pub correlations: Vec<CorrelationDetail>,
    pub ai_prediction: AiPrediction,
    pub correlation_score: f64,
}
