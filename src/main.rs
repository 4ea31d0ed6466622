use anyhow::Result;
use clap::Parser;
use srecmd::api::ApiClient;
use srecmd::commands;
use srecmd::config::ApiConfig;
use srecmd::services::{
    AuthService, DEFAULT_CRITICAL_LIMIT, DEFAULT_HOURS, DEFAULT_LIMIT, DEFAULT_SKIP,
    DEFAULT_VOLUME_HOURS, DashboardService, EventFilter, LogFilter, MetricFilter,
    TelemetryService, TraceFilter,
};

/// srecmd - SRE Command API client
///
/// Query incidents, service health, correlation analysis and telemetry from
/// the SRE Command backend.
///
/// The API address comes from --api-url, then SRE_API_URL, then
/// http://localhost:8000/api. If SRE_API_TOKEN is set, it is sent as a
/// bearer token.
///
/// Examples:
///   srecmd dashboard overview --org 1
///   srecmd telemetry logs --service checkout --level ERROR
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (overrides SRE_API_URL)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Log in, sign up and manage the session
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Dashboard overview, service health and correlation analysis
    #[command(subcommand)]
    Dashboard(DashboardCommand),

    /// Logs, metrics, traces and events
    #[command(subcommand)]
    Telemetry(TelemetryCommand),
}

#[derive(clap::Subcommand, Debug)]
enum AuthCommand {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SRE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a new account
    Signup {
        #[arg(long = "full-name")]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SRE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Exchange a refresh token for a new access token
    Refresh {
        #[arg(long)]
        token: String,
    },
}

#[derive(clap::Args, Debug)]
struct OrgArgs {
    /// Organization ID
    #[arg(long = "org", value_name = "ID")]
    organization_id: u64,

    /// Analysis window in hours
    #[arg(long, default_value_t = DEFAULT_HOURS)]
    hours: u32,
}

#[derive(clap::Subcommand, Debug)]
enum DashboardCommand {
    /// Organization-wide overview
    Overview {
        #[arg(long = "org", value_name = "ID")]
        organization_id: u64,
    },
    /// Health of every service
    ServicesHealth(OrgArgs),
    /// Health of one service
    ServiceHealth {
        #[arg(value_name = "SERVICE")]
        service_name: String,
        #[command(flatten)]
        org: OrgArgs,
    },
    /// Incident volume over time
    IncidentVolume {
        #[arg(long = "service")]
        service_name: Option<String>,
        #[arg(long, default_value_t = DEFAULT_VOLUME_HOURS)]
        hours: u32,
    },
    /// Services currently degraded or critical
    Critical {
        #[command(flatten)]
        org: OrgArgs,
        #[arg(long, default_value_t = DEFAULT_CRITICAL_LIMIT)]
        limit: u32,
    },
    /// Correlation and root-cause analysis
    Correlation {
        #[arg(long = "service")]
        service_name: Option<String>,
        #[command(flatten)]
        org: OrgArgs,
    },
    /// Overview, service health and critical services in one document
    Summary {
        #[command(flatten)]
        org: OrgArgs,
        #[arg(long, default_value_t = DEFAULT_CRITICAL_LIMIT)]
        limit: u32,
    },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_SKIP)]
    skip: u64,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u64,
    #[arg(long = "service")]
    service_name: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum TelemetryCommand {
    /// List log entries
    Logs {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        level: Option<String>,
    },
    /// List metric samples
    Metrics {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long = "metric")]
        metric_name: Option<String>,
    },
    /// List trace spans
    Traces {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long = "trace-id")]
        trace_id: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// List events
    Events {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long = "type")]
        event_type: Option<String>,
        #[arg(long)]
        severity: Option<String>,
    },
    /// Log counts by level
    LogStats {
        #[arg(long = "service")]
        service_name: Option<String>,
    },
    /// Latency percentiles
    LatencyStats {
        #[arg(long = "service")]
        service_name: Option<String>,
        #[arg(long)]
        operation: Option<String>,
    },
    /// Aggregates for one metric
    MetricStats {
        #[arg(value_name = "METRIC")]
        metric_name: String,
        #[arg(long = "service")]
        service_name: Option<String>,
    },
    /// Event counts by type and severity
    EventStats {
        #[arg(long = "service")]
        service_name: Option<String>,
    },
    /// Services reporting telemetry
    Services,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = ApiConfig::from_runtime(&srecmd::runtime::RealRuntime, cli.api_url);
    let client = ApiClient::new(&config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Auth(command) => {
            let auth = AuthService::new(client);
            match command {
                AuthCommand::Login { email, password } => {
                    commands::auth::login(&auth, &email, &password, &mut out).await?
                }
                AuthCommand::Signup {
                    full_name,
                    email,
                    password,
                } => commands::auth::signup(&auth, &full_name, &email, &password, &mut out).await?,
                AuthCommand::Logout => commands::auth::logout(&auth, &mut out).await?,
                AuthCommand::Refresh { token } => {
                    commands::auth::refresh(&auth, &token, &mut out).await?
                }
            }
        }
        Commands::Dashboard(command) => {
            let dashboard = DashboardService::new(client);
            match command {
                DashboardCommand::Overview { organization_id } => {
                    commands::dashboard::overview(&dashboard, organization_id, &mut out).await?
                }
                DashboardCommand::ServicesHealth(org) => {
                    commands::dashboard::services_health(
                        &dashboard,
                        org.organization_id,
                        org.hours,
                        &mut out,
                    )
                    .await?
                }
                DashboardCommand::ServiceHealth { service_name, org } => {
                    commands::dashboard::service_health(
                        &dashboard,
                        &service_name,
                        org.organization_id,
                        org.hours,
                        &mut out,
                    )
                    .await?
                }
                DashboardCommand::IncidentVolume {
                    service_name,
                    hours,
                } => {
                    commands::dashboard::incident_volume(&dashboard, service_name, hours, &mut out)
                        .await?
                }
                DashboardCommand::Critical { org, limit } => {
                    commands::dashboard::critical(
                        &dashboard,
                        org.organization_id,
                        org.hours,
                        limit,
                        &mut out,
                    )
                    .await?
                }
                DashboardCommand::Correlation { service_name, org } => {
                    commands::dashboard::correlation(
                        &dashboard,
                        service_name,
                        org.organization_id,
                        org.hours,
                        &mut out,
                    )
                    .await?
                }
                DashboardCommand::Summary { org, limit } => {
                    commands::dashboard::summary(
                        &dashboard,
                        org.organization_id,
                        org.hours,
                        limit,
                        &mut out,
                    )
                    .await?
                }
            }
        }
        Commands::Telemetry(command) => {
            let telemetry = TelemetryService::new(client);
            match command {
                TelemetryCommand::Logs { page, level } => {
                    let filter = LogFilter {
                        skip: page.skip,
                        limit: page.limit,
                        service_name: page.service_name,
                        level,
                    };
                    commands::telemetry::logs(&telemetry, &filter, &mut out).await?
                }
                TelemetryCommand::Metrics { page, metric_name } => {
                    let filter = MetricFilter {
                        skip: page.skip,
                        limit: page.limit,
                        service_name: page.service_name,
                        metric_name,
                    };
                    commands::telemetry::metrics(&telemetry, &filter, &mut out).await?
                }
                TelemetryCommand::Traces {
                    page,
                    trace_id,
                    status,
                } => {
                    let filter = TraceFilter {
                        skip: page.skip,
                        limit: page.limit,
                        service_name: page.service_name,
                        trace_id,
                        status,
                    };
                    commands::telemetry::traces(&telemetry, &filter, &mut out).await?
                }
                TelemetryCommand::Events {
                    page,
                    event_type,
                    severity,
                } => {
                    let filter = EventFilter {
                        skip: page.skip,
                        limit: page.limit,
                        service_name: page.service_name,
                        event_type,
                        severity,
                    };
                    commands::telemetry::events(&telemetry, &filter, &mut out).await?
                }
                TelemetryCommand::LogStats { service_name } => {
                    commands::telemetry::log_statistics(&telemetry, service_name, &mut out).await?
                }
                TelemetryCommand::LatencyStats {
                    service_name,
                    operation,
                } => {
                    commands::telemetry::latency_statistics(
                        &telemetry,
                        service_name,
                        operation,
                        &mut out,
                    )
                    .await?
                }
                TelemetryCommand::MetricStats {
                    metric_name,
                    service_name,
                } => {
                    commands::telemetry::metric_statistics(
                        &telemetry,
                        &metric_name,
                        service_name,
                        &mut out,
                    )
                    .await?
                }
                TelemetryCommand::EventStats { service_name } => {
                    commands::telemetry::event_statistics(&telemetry, service_name, &mut out)
                        .await?
                }
                TelemetryCommand::Services => {
                    commands::telemetry::services(&telemetry, &mut out).await?
                }
            }
        }
    }
    Ok(())
}
