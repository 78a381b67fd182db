//! Shared request/response plumbing for the HTTP API

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
