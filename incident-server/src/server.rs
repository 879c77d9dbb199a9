use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use incident_core::seed::{sample_incidents, sample_threats};
use incident_core::threats::ThreatTrend;
use incident_core::{IncidentStore, StoreError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Fresh store for one server session, seeded when configured.
pub fn build_store(config: &ServerConfig) -> Result<IncidentStore, StoreError> {
    let mut store = match config.confidence_seed {
        Some(seed) => IncidentStore::with_seed(seed),
        None => IncidentStore::new(),
    };
    if config.seed_sample_data {
        for incident in sample_incidents(store.now()) {
            store.insert(incident)?;
        }
        tracing::info!(count = store.len(), "loaded sample incidents");
    }
    Ok(store)
}

/// Threat feed for the dashboard; empty unless sample data is enabled.
pub fn threat_feed(config: &ServerConfig) -> Vec<ThreatTrend> {
    if config.seed_sample_data {
        sample_threats()
    } else {
        Vec::new()
    }
}

pub fn build_state(config: &ServerConfig) -> Result<AppState, StoreError> {
    Ok(AppState::new(build_store(config)?).with_threats(threat_feed(config)))
}

pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let app = routes::router(state).layer(TraceLayer::new_for_http());
    if config.cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
