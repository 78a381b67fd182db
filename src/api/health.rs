//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::types::Json;
use crate::domain::content::API_VERSION;

use super::state::AppState;

/// `GET /api/health` body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the state was built
    pub uptime: f64,
    pub version: &'static str,
    pub services: ServiceStatus,
}

/// Availability of the collaborators behind the API
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub email: &'static str,
    pub gis: &'static str,
    pub github: &'static str,
}

/// Service status with uptime
pub async fn api_health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: API_VERSION,
        services: ServiceStatus {
            email: if state.mail_configured {
                "configured"
            } else {
                "not_configured"
            },
            gis: "available",
            github: "connected",
        },
    };

    (StatusCode::OK, Json(response))
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
