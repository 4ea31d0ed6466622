//! Response payloads returned by the backend.

mod auth;
mod dashboard;
mod telemetry;

pub use auth::{LoginResponse, RegisterResponse, User, UserRole};
pub use dashboard::{
    AiPrediction, CorrelationAnalysis, CorrelationDetail, CriticalServices, EventCorrelation,
    HealthStatus, IncidentVolume, IncidentVolumePoint, ServiceHealth, ServiceHealthList,
};
pub use telemetry::{
    Event, EventStatistics, LatencyStatistics, LogEntry, LogStatistics, MetricPoint,
    MetricStatistics, Page, ServiceList, TraceSpan,
};
