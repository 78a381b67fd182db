//! Contact form relay

use axum::extract::State;
use serde::Serialize;
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::contact::ContactForm;
use crate::domain::DomainError;

pub const SENT_MESSAGE: &str = "Message sent successfully! I will get back to you soon.";
pub const FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>, ApiError> {
    match state.contact_service.submit(&form).await {
        Ok(_) => Ok(Json(ContactResponse {
            success: true,
            message: SENT_MESSAGE,
        })),
        Err(DomainError::Validation { message }) => Err(ApiError::bad_request(message)),
        Err(e) => {
            error!(error = %e, "Contact form delivery failed");
            Err(ApiError::internal(FAILED_MESSAGE))
        }
    }
}
