//! DCRM Dashboard Server
//!
//! Browser-facing surface for DCRM circuit breaker monitoring.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      DCRM DASHBOARD                           │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   commands    ┌──────────────────────────────┐ │
//! │  │  API      │ ────────────▶ │  Monitoring Service          │ │
//! │  │  (Axum)   │ ◀──────────── │  (timer + tick tasks)        │ │
//! │  └─────┬─────┘   snapshots   └───────┬──────────────┬───────┘ │
//! │        │ one-shot analysis           │              │         │
//! │        ▼                             ▼              ▼         │
//! │  ┌──────────────────────────────────────┐  ┌────────────────┐ │
//! │  │  Classifier API (/predict, /health)  │  │ Sensor /stream │ │
//! │  └──────────────────────────────────────┘  └────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dcrm_monitor_core::{
    ClassifierClient, MonitorHandle, MonitorService, StreamClient, WaveformSource,
};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(config.json_logs());

    tracing::info!("DCRM Dashboard starting ({})", config.environment);
    tracing::info!("Classifier backend: {}", config.api_url);

    // Collaborators
    let classifier = Arc::new(
        ClassifierClient::new(config.classifier_config())
            .context("Failed to build classifier client")?,
    );
    let stream =
        StreamClient::new(config.stream_config()).context("Failed to build stream client")?;

    // Monitoring loop (idle until started)
    let monitor = MonitorService::spawn(
        config.monitor_settings(),
        WaveformSource::new(stream),
        Arc::clone(&classifier),
    );

    // Build application state
    let state = AppState {
        monitor,
        classifier,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.bind_addr, config.port);
    tracing::info!("🚀 Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "dcrm_dashboard=debug,dcrm_monitor_core=info,tower_http=debug".into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub monitor: MonitorHandle,
    pub classifier: Arc<ClassifierClient>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Page and health
    let public_routes = Router::new()
        .route("/", get(handlers::page::dashboard))
        .route("/health", get(handlers::health::check));

    // Continuous monitoring
    let monitor_routes = Router::new()
        .route("/api/v1/monitor", get(handlers::monitor::snapshot))
        .route("/api/v1/monitor/start", post(handlers::monitor::start))
        .route("/api/v1/monitor/stop", post(handlers::monitor::stop))
        .route("/api/v1/monitor/toggle", post(handlers::monitor::toggle))
        .route("/api/v1/monitor/reset", post(handlers::monitor::reset))
        .route("/api/v1/monitor/cadence", put(handlers::monitor::set_cadence))
        .route("/api/v1/monitor/mode", put(handlers::monitor::set_mode))
        .route("/api/v1/monitor/simulation", put(handlers::monitor::set_simulation));

    // One-shot analysis
    let analysis_routes = Router::new()
        .route("/api/v1/analyze/manual", post(handlers::analysis::manual))
        .route("/api/v1/analyze/csv", post(handlers::analysis::csv))
        .route("/api/v1/analyze/test", post(handlers::analysis::test_sample));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(monitor_routes)
        .merge(analysis_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
