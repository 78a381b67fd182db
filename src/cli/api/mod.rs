//! API command - runs API server only (no static site)

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router_with_state, AppState, RouterOptions};
use crate::infrastructure::observability::{create_metrics_router, init_metrics, PrometheusMetrics};

/// Run the API-only server
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let state = crate::create_app_state_with_config(&config).await?;
    let metrics = init_metrics(&config.metrics);

    let options = RouterOptions {
        static_dir: None,
        ..crate::router_options(&config)
    };
    let app = create_api_router(state, &options, metrics, &config.metrics.path);

    let addr = super::socket_addr(&config.server.host, config.server.port)?;
    info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(super::shutdown_signal())
    .await?;

    info!("API server shutdown complete");

    Ok(())
}

/// API router plus the metrics endpoint when enabled
fn create_api_router(
    state: AppState,
    options: &RouterOptions,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let router = create_router_with_state(state, options);

    match metrics {
        Some(m) => create_metrics_router(m, metrics_path).merge(router),
        None => router,
    }
}
