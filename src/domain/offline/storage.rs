//! Named cache storage traits

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::manifest::CacheName;
use super::request::{AssetResponse, RequestKey};
use crate::domain::DomainError;

/// One cache generation: request identity mapped to a stored response
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    fn name(&self) -> &CacheName;

    /// Exact-key lookup
    async fn get(&self, key: &RequestKey) -> Result<Option<AssetResponse>, DomainError>;

    /// Store a single entry; only GET requests can be stored
    async fn put(&self, key: RequestKey, response: AssetResponse) -> Result<(), DomainError>;

    /// Store a batch. Either every entry is accepted or none is.
    async fn put_all(&self, entries: Vec<(RequestKey, AssetResponse)>) -> Result<(), DomainError>;

    async fn keys(&self) -> Result<Vec<RequestKey>, DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;

    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}

/// The set of named cache generations owned by one site
#[async_trait]
pub trait CacheStorage: Send + Sync + Debug {
    /// Open the named store, creating it when missing
    async fn open(&self, name: &CacheName) -> Result<Arc<dyn CacheStore>, DomainError>;

    /// Open the named store only if it exists
    async fn lookup(&self, name: &CacheName) -> Result<Option<Arc<dyn CacheStore>>, DomainError>;

    async fn has(&self, name: &CacheName) -> Result<bool, DomainError>;

    /// Remove a whole generation. Returns whether it existed.
    async fn delete(&self, name: &CacheName) -> Result<bool, DomainError>;

    /// Names in creation order
    async fn keys(&self) -> Result<Vec<CacheName>, DomainError>;
}

/// Reject keys a cache cannot hold
pub fn ensure_storable(key: &RequestKey) -> Result<(), DomainError> {
    if !key.is_get() {
        return Err(DomainError::cache(format!(
            "Request method '{}' is unsupported for caching",
            key.method()
        )));
    }

    Ok(())
}
