//! HTTP Server and Metrics Collection
//!
//! This module implements the Prometheus exporter HTTP server. Metrics are collected
//! on demand: every request to the metrics path queries the sonnenBatterie and renders
//! whatever succeeded.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing the metrics path, `/health`, and `/`
//! - **Scrape**: Each metrics request builds a fresh registry, runs the collectors
//!   sequentially, and renders the result
//! - **State Management**: Shared state (catalog, client, clock) is immutable and cheap to clone
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET <metrics_path>` - Prometheus metrics in text format (default `/metrics`)
//! - `GET /health` - Health check (returns 200 if the sonnenBatterie answers, 503 otherwise)
//!
//! # Error Handling
//!
//! Individual API failures are logged as warnings and only drop their own metric group.
//! Dropping a request (client disconnect or Prometheus scrape timeout) cancels the
//! in-flight appliance request with it.

use crate::collectors::{self, CollectionContext};
use crate::config::Config;
use crate::metrics::MetricsCatalog;
use crate::sonnen::SonnenClient;
use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::SystemTime;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Source of "now" for timestamp conversions
pub type Clock = fn() -> SystemTime;

#[derive(Clone)]
pub struct AppState {
    pub catalog: MetricsCatalog,
    pub client: Arc<SonnenClient>,
    pub metrics_path: String,
    pub clock: Clock,
}

impl AppState {
    pub fn new(catalog: MetricsCatalog, client: SonnenClient, metrics_path: impl Into<String>) -> Self {
        Self {
            catalog,
            client: Arc::new(client),
            metrics_path: metrics_path.into(),
            clock: SystemTime::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let catalog = MetricsCatalog::new().context("Failed to initialize metrics registry")?;
    let client = SonnenClient::new(&config.sonnenbatterie)?;

    if !client.supports_authenticated_endpoints() {
        warn!("No sonnenbatterie token configured, only status metrics will be collected");
    }

    let state = AppState::new(catalog, client, config.server.metrics_path.clone());
    let app = router(state);

    // Start the server
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Metrics server listening on {}", addr);
    info!(
        "Metrics available at http://{}{}",
        addr, config.server.metrics_path
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the exporter's router
pub fn router(state: AppState) -> Router {
    let metrics_path = state.metrics_path.clone();

    Router::new()
        .route("/", get(root_handler))
        .route(&metrics_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs one full scrape and returns the rendered exposition text
pub async fn scrape(state: &AppState) -> crate::error::Result<String> {
    let registry = state.catalog.registry()?;
    let ctx = CollectionContext {
        client: &state.client,
        metrics: &registry,
        now: (state.clock)(),
    };

    collectors::collect_all(&ctx).await;

    registry.render()
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(format!(
        r#"<html>
<head><title>Sonnenbatterie Exporter</title></head>
<body>
<h1>Sonnenbatterie Exporter</h1>
<p><a href="{path}">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
        path = state.metrics_path
    ))
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match scrape(&state).await {
        Ok(metrics) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], metrics).into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.get_status().await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "sonnenBatterie API unreachable",
            )
        }
    }
}
