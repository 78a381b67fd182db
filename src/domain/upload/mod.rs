//! Upload domain - accepted file metadata, filtering policy and storage

mod policy;

pub use policy::{
    stored_filename, UploadError, UploadPolicy, DEFAULT_ALLOWED_EXTENSIONS,
    DEFAULT_MAX_UPLOAD_BYTES,
};

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DomainError;

/// Metadata of an accepted upload as reported to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub filename: String,
    pub original_name: String,
    pub size: u64,
    pub mimetype: String,
    pub upload_date: DateTime<Utc>,
    pub path: String,
}

/// Persists accepted uploads
#[async_trait]
pub trait FileStore: Send + Sync + Debug {
    /// Write `contents` under `filename`, returning the stored path
    async fn save(&self, filename: &str, contents: Bytes) -> Result<String, DomainError>;
}
