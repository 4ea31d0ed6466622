use anyhow::Result;
use log::debug;
use std::io::Write;

use super::write_json;
use crate::services::{EventFilter, LogFilter, MetricFilter, TelemetryApi, TraceFilter};

#[tracing::instrument(skip(telemetry, out))]
pub async fn logs<T: TelemetryApi, W: Write>(
    telemetry: &T,
    filter: &LogFilter,
    out: &mut W,
) -> Result<()> {
    let page = telemetry.get_logs(filter).await?;
    debug!("Fetched {} of {} log(s)", page.items.len(), page.total);
    write_json(out, &page)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn metrics<T: TelemetryApi, W: Write>(
    telemetry: &T,
    filter: &MetricFilter,
    out: &mut W,
) -> Result<()> {
    let page = telemetry.get_metrics(filter).await?;
    debug!("Fetched {} of {} metric(s)", page.items.len(), page.total);
    write_json(out, &page)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn traces<T: TelemetryApi, W: Write>(
    telemetry: &T,
    filter: &TraceFilter,
    out: &mut W,
) -> Result<()> {
    let page = telemetry.get_traces(filter).await?;
    debug!("Fetched {} of {} span(s)", page.items.len(), page.total);
    write_json(out, &page)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn events<T: TelemetryApi, W: Write>(
    telemetry: &T,
    filter: &EventFilter,
    out: &mut W,
) -> Result<()> {
    let page = telemetry.get_events(filter).await?;
    debug!("Fetched {} of {} event(s)", page.items.len(), page.total);
    write_json(out, &page)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn log_statistics<T: TelemetryApi, W: Write>(
    telemetry: &T,
    service_name: Option<String>,
    out: &mut W,
) -> Result<()> {
    let stats = telemetry.get_log_statistics(service_name).await?;
    write_json(out, &stats)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn latency_statistics<T: TelemetryApi, W: Write>(
    telemetry: &T,
    service_name: Option<String>,
    operation: Option<String>,
    out: &mut W,
) -> Result<()> {
    let stats = telemetry
        .get_latency_statistics(service_name, operation)
        .await?;
    write_json(out, &stats)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn metric_statistics<T: TelemetryApi, W: Write>(
    telemetry: &T,
    metric_name: &str,
    service_name: Option<String>,
    out: &mut W,
) -> Result<()> {
    let stats = telemetry
        .get_metric_statistics(metric_name, service_name)
        .await?;
    write_json(out, &stats)
}

#[tracing::instrument(skip(telemetry, out))]
pub async fn event_statistics<T: TelemetryApi, W: Write>(
    telemetry: &T,
    service_name: Option<String>,
    out: &mut W,
) -> Result<()> {
    let stats = telemetry.get_event_statistics(service_name).await?;
    write_json(out, &stats)
}

/// Prints the known service names, one per line.
#[tracing::instrument(skip(telemetry, out))]
pub async fn services<T: TelemetryApi, W: Write>(telemetry: &T, out: &mut W) -> Result<()> {
    let list = telemetry.get_services().await?;
    if list.services.is_empty() {
        writeln!(out, "No services reporting telemetry.")?;
        return Ok(());
    }
    for name in &list.services {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}
