use anyhow::Context;
use clap::Parser;
use incident_core::portal::{Portal, PortalEvent, ReportForm};
use incident_core::projection::{StatusFilter, Tab};
use incident_core::{Category, IncidentId, Severity, Status};
use incident_server::config::ServerConfig;
use incident_server::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "incident-server", version, about = "AI-enabled cyber incident portal backend")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address as host:port, overriding the configured one.
    #[arg(short, long)]
    bind: Option<String>,

    /// Start with an empty store.
    #[arg(long)]
    no_seed: bool,

    /// Drive a scripted portal session, print it as JSON and exit.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if cli.no_seed {
        config.seed_sample_data = false;
    }
    init_tracing(&config.log_level);

    if cli.demo {
        return run_demo(&config);
    }

    let app = server::app(server::build_state(&config)?, &config);

    let addr = cli.bind.unwrap_or_else(|| config.bind_addr());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "incident portal listening");

    server::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_demo(config: &ServerConfig) -> anyhow::Result<()> {
    let mut portal =
        Portal::new(server::build_store(config)?).with_threats(server::threat_feed(config));

    portal.handle(PortalEvent::SubmitReport(ReportForm {
        title: "Ransom note on file server".into(),
        category: Category::Malware,
        description: "Shares encrypted overnight, note left in every folder".into(),
        severity: Some(Severity::Critical),
    }))?;
    if let Some(first) = portal.store().incidents().first().map(|i| i.id) {
        portal.handle(PortalEvent::ChangeStatus {
            id: first,
            status: Status::Resolved,
        })?;
    }
    // Unknown ids surface as a user-facing message rather than aborting the demo.
    let _ = portal.handle(PortalEvent::ChangeStatus {
        id: IncidentId(999),
        status: Status::Closed,
    });
    if let Some(message) = portal.error() {
        println!("error banner: {message}");
    }

    println!("dashboard:\n{}", serde_json::to_string_pretty(&portal.dashboard())?);

    portal.handle(PortalEvent::SelectTab(Tab::Incidents))?;
    portal.handle(PortalEvent::Filter(StatusFilter::Only(Status::Investigating)))?;
    println!("investigating:\n{}", serde_json::to_string_pretty(&portal.visible())?);

    Ok(())
}
