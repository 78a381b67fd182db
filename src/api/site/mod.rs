//! Portfolio site API endpoints

pub mod contact;
pub mod content;
pub mod github;
pub mod gis;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use super::health;
use super::middleware::{rate_limit_middleware, RateLimitGuard, CONTACT_LIMIT_MESSAGE, MULTIPART_OVERHEAD};
use super::state::AppState;

/// Routes mounted under `/api`
pub fn create_site_router(state: &AppState) -> Router<AppState> {
    let contact_guard = RateLimitGuard::new(state.rate_limits.contact.clone(), CONTACT_LIMIT_MESSAGE);
    let upload_limit = state.upload_service.policy().max_bytes() as usize + MULTIPART_OVERHEAD;

    let upload = post(gis::upload_gis).layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .route("/", get(content::index))
        .route("/docs", get(content::docs))
        .route("/health", get(health::api_health))
        .route("/portfolio", get(content::portfolio))
        .route("/publications", get(content::publications))
        .route("/blog", get(content::blog))
        .route("/analytics", get(content::analytics))
        .route(
            "/contact",
            post(contact::submit_contact).route_layer(middleware::from_fn_with_state(
                contact_guard,
                rate_limit_middleware,
            )),
        )
        .route("/github/repos", get(github::list_repos))
        .route("/upload/gis", upload.clone())
        .route("/gis/upload", upload)
        .route("/gis/analyze", post(gis::analyze))
        .route("/gis/data/{type}", get(gis::sample_data))
        .route("/resume/download", get(content::resume_download))
}
