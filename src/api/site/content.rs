//! Read-only portfolio endpoints

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::middleware::client_ip;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::content::{
    api_docs, api_index, AnalyticsSnapshot, BlogPost, Portfolio, Publication,
};

/// `<scheme>://<host>` as seen by the client
fn public_base(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|v| *v == "https" || *v == "http")
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}

/// GET /api
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    Json(api_index(&public_base(&headers), state.content.author()))
}

/// GET /api/docs
pub async fn docs(headers: HeaderMap) -> Json<Value> {
    Json(api_docs(&public_base(&headers)))
}

/// GET /api/portfolio
pub async fn portfolio(State(state): State<AppState>) -> Json<Portfolio> {
    debug!("Serving portfolio");
    Json(state.content.portfolio().clone())
}

/// GET /api/publications
pub async fn publications(State(state): State<AppState>) -> Json<Vec<Publication>> {
    Json(state.content.publications().to_vec())
}

/// GET /api/blog
pub async fn blog(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(state.content.blog_posts().to_vec())
}

/// GET /api/analytics
pub async fn analytics(State(state): State<AppState>) -> Json<AnalyticsSnapshot> {
    Json(state.content.analytics(Utc::now()))
}

/// GET /api/resume/download
pub async fn resume_download(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let location = HeaderValue::from_str(&state.resume_url)
        .map_err(|_| ApiError::internal("Failed to process resume download"))?;

    info!(
        client = %client_ip(&request),
        at = %Utc::now().to_rfc3339(),
        "Resume downloaded"
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
