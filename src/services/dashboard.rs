use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiClient, ApiError, ApiResult, QueryParams, encode_path_segment};
use crate::models::{
    CorrelationAnalysis, CriticalServices, IncidentVolume, ServiceHealth, ServiceHealthList,
};

const SERVICES_HEALTH: &str = "/dashboard/services/health";
const INCIDENT_VOLUME: &str = "/dashboard/incident-volume";
const CRITICAL_SERVICES: &str = "/dashboard/services/critical";
const CORRELATION: &str = "/dashboard/correlation";

/// Default analysis window for health and correlation queries.
pub const DEFAULT_HOURS: u32 = 1;
/// Default window for incident volume trends.
pub const DEFAULT_VOLUME_HOURS: u32 = 24;
/// Default number of critical services returned.
pub const DEFAULT_CRITICAL_LIMIT: u32 = 10;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn get_overview(&self, organization_id: u64) -> ApiResult<Value>;
    async fn get_services_health(
        &self,
        organization_id: u64,
        hours: u32,
    ) -> ApiResult<ServiceHealthList>;
    async fn get_service_health(
        &self,
        service_name: &str,
        organization_id: u64,
        hours: u32,
    ) -> ApiResult<ServiceHealth>;
    async fn get_incident_volume(
        &self,
        service_name: Option<String>,
        hours: u32,
    ) -> ApiResult<IncidentVolume>;
    async fn get_critical_services(
        &self,
        organization_id: u64,
        hours: u32,
        limit: u32,
    ) -> ApiResult<CriticalServices>;
    async fn get_correlation_analysis(
        &self,
        service_name: Option<String>,
        organization_id: u64,
        hours: u32,
    ) -> ApiResult<CorrelationAnalysis>;
}

#[derive(Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DashboardApi for DashboardService {
    #[tracing::instrument(skip(self))]
    async fn get_overview(&self, organization_id: u64) -> ApiResult<Value> {
        let path = format!("/dashboard/overview/{}", organization_id);
        self.client.get(&path, QueryParams::new()).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_services_health(
        &self,
        organization_id: u64,
        hours: u32,
    ) -> ApiResult<ServiceHealthList> {
        let query = QueryParams::new()
            .with("organization_id", organization_id)
            .with("hours", hours);
        self.client.get(SERVICES_HEALTH, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_service_health(
        &self,
        service_name: &str,
        organization_id: u64,
        hours: u32,
    ) -> ApiResult<ServiceHealth> {
        if service_name.trim().is_empty() {
            return Err(ApiError::invalid_request("Service name must not be empty"));
        }

        let path = format!(
            "/dashboard/services/{}/health",
            encode_path_segment(service_name)
        );
        let query = QueryParams::new()
            .with("organization_id", organization_id)
            .with("hours", hours);
        self.client.get(&path, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_incident_volume(
        &self,
        service_name: Option<String>,
        hours: u32,
    ) -> ApiResult<IncidentVolume> {
        let query = QueryParams::new()
            .with_opt("service_name", service_name)
            .with("hours", hours);
        self.client.get(INCIDENT_VOLUME, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_critical_services(
        &self,
        organization_id: u64,
        hours: u32,
        limit: u32,
    ) -> ApiResult<CriticalServices> {
        let query = QueryParams::new()
            .with("organization_id", organization_id)
            .with("hours", hours)
            .with("limit", limit);
        self.client.get(CRITICAL_SERVICES, query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_correlation_analysis(
        &self,
        service_name: Option<String>,
        organization_id: u64,
        hours: u32,
    ) -> ApiResult<CorrelationAnalysis> {
        let query = QueryParams::new()
            .with_opt("service_name", service_name)
            .with("organization_id", organization_id)
            .with("hours", hours);
        self.client.get(CORRELATION, query).await
    }
}
