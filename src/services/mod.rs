//! Typed wrappers over the backend endpoints, one per API area.

mod auth;
mod dashboard;
mod telemetry;

pub use auth::{AuthApi, AuthService};
pub use dashboard::{
    DEFAULT_CRITICAL_LIMIT, DEFAULT_HOURS, DEFAULT_VOLUME_HOURS, DashboardApi, DashboardService,
};
pub use telemetry::{
    DEFAULT_LIMIT, DEFAULT_SKIP, EventFilter, LogFilter, MetricFilter, TelemetryApi,
    TelemetryService, TraceFilter,
};

#[cfg(test)]
pub use auth::MockAuthApi;
#[cfg(test)]
pub use dashboard::MockDashboardApi;
#[cfg(test)]
pub use telemetry::MockTelemetryApi;
