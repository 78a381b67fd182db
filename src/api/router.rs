use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    RateLimitGuard, GLOBAL_LIMIT_MESSAGE, MAX_BODY_SIZE,
};
use super::site;
use super::state::AppState;
use super::types::ApiError;

/// Router-level settings that are not part of the handler state
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Allowed CORS origins; credentials are allowed for these
    pub cors_origins: Vec<String>,
    /// Serve static site files from this directory when set
    pub static_dir: Option<PathBuf>,
}

/// Create a minimal router without state (probes only)
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, options: &RouterOptions) -> Router {
    let global_guard = RateLimitGuard::new(state.rate_limits.global.clone(), GLOBAL_LIMIT_MESSAGE);

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/api", site::create_site_router(&state));

    let router = match &options.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).not_found_service(not_found.into_service()),
        ),
        None => router.fallback(not_found),
    };

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn_with_state(global_guard, rate_limit_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer(&options.cors_origins))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// JSON 404 for anything no route or file matched
async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found("Endpoint not found").with_message(format!(
        "The requested endpoint {} {} was not found.",
        method,
        uri.path()
    ))
}
