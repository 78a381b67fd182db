//! Upload storage on the local filesystem

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::info;

use crate::domain::upload::FileStore;
use crate::domain::DomainError;

/// Writes uploads into a single directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    dir: PathBuf,
}

impl DiskFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn save(&self, filename: &str, contents: Bytes) -> Result<String, DomainError> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(DomainError::validation(format!(
                "Invalid stored filename: {}",
                filename
            )));
        }

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.dir.join(filename);
        fs::write(&path, &contents).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), size = contents.len(), "Stored upload");
        Ok(path.display().to_string())
    }
}
