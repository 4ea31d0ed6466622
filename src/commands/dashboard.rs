use anyhow::Result;
use futures_util::future::try_join3;
use log::debug;
use serde_json::json;
use std::io::Write;

use super::write_json;
use crate::services::DashboardApi;

#[tracing::instrument(skip(dashboard, out))]
pub async fn overview<D: DashboardApi, W: Write>(
    dashboard: &D,
    organization_id: u64,
    out: &mut W,
) -> Result<()> {
    let overview = dashboard.get_overview(organization_id).await?;
    write_json(out, &overview)
}

#[tracing::instrument(skip(dashboard, out))]
pub async fn services_health<D: DashboardApi, W: Write>(
    dashboard: &D,
    organization_id: u64,
    hours: u32,
    out: &mut W,
) -> Result<()> {
    let health = dashboard
        .get_services_health(organization_id, hours)
        .await?;
    write_json(out, &health)
}

#[tracing::instrument(skip(dashboard, out))]
pub async fn service_health<D: DashboardApi, W: Write>(
    dashboard: &D,
    service_name: &str,
    organization_id: u64,
    hours: u32,
    out: &mut W,
) -> Result<()> {
    let health = dashboard
        .get_service_health(service_name, organization_id, hours)
        .await?;
    write_json(out, &health)
}

#[tracing::instrument(skip(dashboard, out))]
pub async fn incident_volume<D: DashboardApi, W: Write>(
    dashboard: &D,
    service_name: Option<String>,
    hours: u32,
    out: &mut W,
) -> Result<()> {
    let volume = dashboard.get_incident_volume(service_name, hours).await?;
    write_json(out, &volume)
}

/// Prints only the list of critical services, without the envelope.
#[tracing::instrument(skip(dashboard, out))]
pub async fn critical<D: DashboardApi, W: Write>(
    dashboard: &D,
    organization_id: u64,
    hours: u32,
    limit: u32,
    out: &mut W,
) -> Result<()> {
    let critical = dashboard
        .get_critical_services(organization_id, hours, limit)
        .await?;
    debug!("{} critical service(s)", critical.count);
    write_json(out, &critical.services)
}

#[tracing::instrument(skip(dashboard, out))]
pub async fn correlation<D: DashboardApi, W: Write>(
    dashboard: &D,
    service_name: Option<String>,
    organization_id: u64,
    hours: u32,
    out: &mut W,
) -> Result<()> {
    let analysis = dashboard
        .get_correlation_analysis(service_name, organization_id, hours)
        .await?;
    write_json(out, &analysis)
}

/// Fetches the overview, per-service health and critical services
/// concurrently and prints them as one document. Fails on the first error.
#[tracing::instrument(skip(dashboard, out))]
pub async fn summary<D: DashboardApi, W: Write>(
    dashboard: &D,
    organization_id: u64,
    hours: u32,
    limit: u32,
    out: &mut W,
) -> Result<()> {
    let (overview, health, critical) = try_join3(
        dashboard.get_overview(organization_id),
        dashboard.get_services_health(organization_id, hours),
        dashboard.get_critical_services(organization_id, hours, limit),
    )
    .await?;

    write_json(
        out,
        &json!({
            "overview": overview,
            "services_health": health.data,
            "critical_services": critical.services,
        }),
    )
}
