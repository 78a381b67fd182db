//! GIS endpoints: upload, canned analysis and sample data

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::gis::{AnalysisRequest, AnalysisResult, SampleKind};
use crate::domain::upload::{UploadError, UploadedFile};
use crate::domain::DomainError;
use crate::infrastructure::services::IncomingFile;

/// Multipart field carrying the upload
pub const UPLOAD_FIELD: &str = "gisFile";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: &'static str,
    pub file: UploadedFile,
}

fn multipart_error(state: &AppState, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let max_bytes = state.upload_service.policy().max_bytes();
        return ApiError::bad_request(UploadError::TooLarge { max_bytes }.to_string());
    }

    warn!(error = %err.body_text(), "Malformed multipart body");
    ApiError::bad_request("Invalid multipart request")
}

/// POST /api/upload/gis and /api/gis/upload
pub async fn upload_gis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut incoming = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let mimetype = field.content_type().unwrap_or_default().to_string();
        let contents = field.bytes().await.map_err(|e| multipart_error(&state, e))?;

        incoming = Some(IncomingFile {
            field: UPLOAD_FIELD.to_string(),
            original_name,
            mimetype,
            contents,
        });
        break;
    }

    let incoming = incoming.ok_or_else(|| ApiError::bad_request(UploadError::NoFile.to_string()))?;

    let file = match state.upload_service.accept(incoming).await {
        Ok(file) => file,
        Err(DomainError::Validation { message }) => return Err(ApiError::bad_request(message)),
        Err(e) => {
            error!(error = %e, "File upload failed");
            return Err(ApiError::internal("File upload failed"));
        }
    };

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully",
        file,
    }))
}

/// POST /api/gis/analyze
pub async fn analyze(Json(request): Json<AnalysisRequest>) -> Json<AnalysisResult> {
    debug!(analysis_type = ?request.analysis_type, "Running GIS analysis");
    Json(AnalysisResult::completed(request, Utc::now()))
}

/// GET /api/gis/data/{type}
pub async fn sample_data(Path(kind): Path<String>) -> Json<Value> {
    Json(SampleKind::parse(&kind).feature_collection())
}
