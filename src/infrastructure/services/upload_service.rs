//! Upload service - filters and persists uploaded files

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::domain::upload::{stored_filename, FileStore, UploadPolicy, UploadedFile};
use crate::domain::DomainError;

/// A file as received from the client
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub field: String,
    pub original_name: String,
    pub mimetype: String,
    pub contents: Bytes,
}

/// Applies the upload policy and stores accepted files
#[derive(Debug, Clone)]
pub struct UploadService {
    policy: UploadPolicy,
    store: Arc<dyn FileStore>,
}

impl UploadService {
    pub fn new(policy: UploadPolicy, store: Arc<dyn FileStore>) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Type check, then size check, then store under a generated name
    pub async fn accept(&self, file: IncomingFile) -> Result<UploadedFile, DomainError> {
        let ext = self
            .policy
            .check_type(&file.original_name, &file.mimetype)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let size = file.contents.len() as u64;
        self.policy
            .check_size(size)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let now = Utc::now();
        let suffix = rand::thread_rng().gen_range(0..1_000_000_000u32);
        let filename = stored_filename(&file.field, now.timestamp_millis(), suffix, &ext);

        let path = self.store.save(&filename, file.contents).await?;

        info!(
            original = %file.original_name,
            stored = %filename,
            size,
            "Accepted upload"
        );

        Ok(UploadedFile {
            filename,
            original_name: file.original_name,
            size,
            mimetype: file.mimetype,
            upload_date: now,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upload::DEFAULT_ALLOWED_EXTENSIONS;
    use crate::infrastructure::upload::DiskFileStore;

    fn incoming(name: &str, mime: &str, contents: &'static [u8]) -> IncomingFile {
        IncomingFile {
            field: "gisFile".to_string(),
            original_name: name.to_string(),
            mimetype: mime.to_string(),
            contents: Bytes::from_static(contents),
        }
    }

    #[tokio::test]
    async fn test_accepts_and_stores_geojson() {
        let tmp = tempfile::tempdir().unwrap();
        let service = UploadService::new(
            UploadPolicy::default(),
            Arc::new(DiskFileStore::new(tmp.path())),
        );

        let file = service
            .accept(incoming("parcels.geojson", "application/geo+json", b"{}"))
            .await
            .unwrap();

        assert!(file.filename.starts_with("gisFile-"));
        assert!(file.filename.ends_with(".geojson"));
        assert_eq!(file.original_name, "parcels.geojson");
        assert_eq!(file.size, 2);
        assert!(std::path::Path::new(&file.path).exists());
    }

    #[tokio::test]
    async fn test_rejects_invalid_type_without_storing() {
        let tmp = tempfile::tempdir().unwrap();
        let service = UploadService::new(
            UploadPolicy::default(),
            Arc::new(DiskFileStore::new(tmp.path().join("uploads"))),
        );

        let err = service
            .accept(incoming("run.exe", "application/x-msdownload", b"MZ"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("Invalid file type"));
        assert!(!tmp.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let tmp = tempfile::tempdir().unwrap();
        let policy = UploadPolicy::new(
            4,
            DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()),
        );
        let service = UploadService::new(policy, Arc::new(DiskFileStore::new(tmp.path())));

        let err = service
            .accept(incoming("map.kml", "application/vnd.google-earth.kml+xml", b"<kml/>"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("File too large"));
    }
}
