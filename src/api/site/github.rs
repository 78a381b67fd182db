//! Repository listing endpoint

use axum::extract::State;
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::repository::RepositorySummary;

/// GET /api/github/repos
pub async fn list_repos(
    State(state): State<AppState>,
) -> Result<Json<Vec<RepositorySummary>>, ApiError> {
    let repos = state.repositories.latest().await.map_err(|e| {
        error!(error = %e, "Repository listing failed");
        ApiError::internal("Failed to fetch GitHub repositories")
    })?;

    Ok(Json(repos))
}
