//! Credit Risk Scoring Server
//!
//! Serves the operator form and the JSON scoring API over one read-only
//! artifact store loaded at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CREDIT RISK SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────────────────────────────────┐ │
//! │  │  Form     │  │  /api/v1/predict                        │ │
//! │  │  (HTML)   │  │  validate → reconcile → transform →     │ │
//! │  │           │  │  predict → decide → explain             │ │
//! │  └─────┬─────┘  └────────────────────┬────────────────────┘ │
//! │        └─────────────────────────────┘                      │
//! │                       ▼                                     │
//! │              ┌──────────────────┐                           │
//! │              │  ArtifactStore   │  (Arc, read-only)         │
//! │              └──────────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use credit_risk_core::ArtifactStore;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging (JSON lines in production)
    let json_logs = config.is_production();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "credit_risk_server=debug,credit_risk_core=info,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Credit Risk Server v{} starting...", env!("CARGO_PKG_VERSION"));

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid risk thresholds: {}", e))?;

    // Artifacts are loaded exactly once; any failure is fatal
    let store = ArtifactStore::load(&config.artifact_dir).with_context(|| {
        format!(
            "Failed to load artifacts from {}",
            config.artifact_dir.display()
        )
    })?;
    tracing::info!(
        "Thresholds: HIGH > {}, MEDIUM > {}",
        config.thresholds.high,
        config.thresholds.medium
    );

    let state = AppState {
        store: Arc::new(store),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::health::check));

    let api_routes = Router::new()
        .route("/api/v1/form", get(handlers::form::fields))
        .route("/api/v1/model", get(handlers::model::info))
        .route("/api/v1/predict", post(handlers::predict::predict));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
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
