//! Offline command - cache-first proxy in front of the deployed site
//!
//! Every request is rewritten against the site origin and answered by the
//! registered offline worker, so install, activation and cache-first
//! fetching run exactly as they would for a visitor's browser.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderName, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use clap::Args;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use url::Url;

use crate::api::middleware::{logging_middleware, MAX_BODY_SIZE};
use crate::api::types::ApiError;
use crate::config::OfflineConfig;
use crate::domain::offline::{
    AssetRequest, CacheName, CacheStorage, FetchOutcome, Fetcher, OfflineWorker,
    RegistrationStatus, ResponseSource, WorkerManifest, WorkerRegistration,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{create_metrics_router, init_metrics, record_offline_fetch};
use crate::infrastructure::offline::{HttpFetcher, InMemoryCacheStorage};

/// Response header telling whether the cache or the network answered
pub const SOURCE_HEADER: &str = "x-offline-source";

/// Path of the registration status endpoint
pub const STATUS_PATH: &str = "/__offline/status";

/// Arguments for the offline command
#[derive(Args, Clone, Debug)]
pub struct OfflineArgs {
    /// Site origin to front (overrides config)
    #[arg(long)]
    pub origin: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Cache generation name to install (overrides config)
    #[arg(long)]
    pub cache_name: Option<String>,
}

impl OfflineArgs {
    fn apply(&self, mut config: OfflineConfig) -> OfflineConfig {
        if let Some(origin) = &self.origin {
            config.origin = origin.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(cache_name) = &self.cache_name {
            config.cache_name = cache_name.clone();
        }
        config
    }
}

/// Run the offline proxy
pub async fn run(args: OfflineArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let offline = args.apply(config.offline.clone());

    let origin = Url::parse(&offline.origin)?;
    let storage: Arc<dyn CacheStorage> = Arc::new(InMemoryCacheStorage::new());
    let network: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(origin.clone()));

    let registration = Arc::new(WorkerRegistration::new(storage.clone(), network.clone()));
    let manifest = WorkerManifest::new(
        CacheName::new(offline.cache_name.clone())?,
        &offline.origin,
        &offline.precache,
    )?;

    info!(
        origin = %origin,
        cache = %manifest.cache_name(),
        entries = manifest.precache().len(),
        "Installing offline worker"
    );

    let worker = Arc::new(OfflineWorker::new(manifest, storage, network));

    // Keep serving from the network when the first install fails
    if let Err(e) = registration.deploy(worker).await {
        error!(error = %e, "Offline worker install failed, proxying without a cache");
    }

    let mut app = create_offline_router(ProxyState {
        registration,
        origin,
    });

    if let Some(metrics) = init_metrics(&config.metrics) {
        app = create_metrics_router(metrics, &config.metrics.path).merge(app);
    }

    let addr = super::socket_addr(&config.server.host, offline.port)?;
    info!("Starting offline proxy on {} for {}", addr, offline.origin);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(super::shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct ProxyState {
    registration: Arc<WorkerRegistration>,
    origin: Url,
}

/// Status endpoint plus a catch-all routed through the worker
fn create_offline_router(state: ProxyState) -> Router {
    Router::new()
        .route(STATUS_PATH, get(status_handler))
        .fallback(proxy_handler)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn status_handler(
    State(state): State<ProxyState>,
) -> Result<Json<RegistrationStatus>, ApiError> {
    Ok(Json(state.registration.status().await?))
}

async fn proxy_handler(State(state): State<ProxyState>, request: Request<Body>) -> Response {
    let asset = match to_asset_request(&state.origin, request).await {
        Ok(asset) => asset,
        Err(e) => return e.into_response(),
    };

    match state.registration.handle_fetch(&asset).await {
        Ok(outcome) => {
            let cache = state
                .registration
                .active_cache_name()
                .await
                .map(|name| name.to_string())
                .unwrap_or_else(|| "none".to_string());

            record_offline_fetch(&cache, &outcome);
            to_http_response(outcome)
        }
        Err(e) => {
            warn!(url = %asset.url, error = %e, "Offline fetch failed");
            ApiError::from(e).into_response()
        }
    }
}

async fn to_asset_request(origin: &Url, request: Request<Body>) -> Result<AssetRequest, ApiError> {
    let (parts, body) = request.into_parts();

    // Path and query only; the host always stays the site origin
    let mut url = origin.clone();
    url.set_path(parts.uri.path());
    url.set_query(parts.uri.query());

    let mut asset = AssetRequest::new(parts.method.as_str(), url);

    for (name, value) in parts.headers.iter() {
        if name == axum::http::header::HOST {
            continue;
        }
        if let Ok(value) = value.to_str() {
            asset = asset.with_header(name.as_str(), value);
        }
    }

    let body = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|_| ApiError::payload_too_large("Request body too large"))?;

    Ok(asset.with_body(body))
}

fn to_http_response(outcome: FetchOutcome) -> Response {
    let FetchOutcome {
        response, source, ..
    } = outcome;

    let status = match StatusCode::from_u16(response.status) {
        Ok(status) => status,
        Err(_) => {
            return ApiError::from(DomainError::upstream(
                "network",
                format!("Invalid status {} from {}", response.status, response.url),
            ))
            .into_response()
        }
    };

    let mut builder = Response::builder().status(status);

    for (name, value) in &response.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            builder = builder.header(name, value);
        }
    }

    let source = match source {
        ResponseSource::Cache => "cache",
        ResponseSource::Network => "network",
    };

    builder
        .header(SOURCE_HEADER, source)
        .body(Body::from(response.body))
        .unwrap_or_else(|e| ApiError::internal(e.to_string()).into_response())
}
