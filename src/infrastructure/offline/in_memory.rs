//! In-memory cache storage using moka
//!
//! Generations are unbounded and never expire on their own: an entry lives
//! until its whole generation is deleted.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;

use crate::domain::offline::{
    ensure_storable, AssetResponse, CacheName, CacheStorage, CacheStore, RequestKey,
};
use crate::domain::DomainError;

/// One cache generation held in memory
#[derive(Debug)]
pub struct InMemoryCacheStore {
    name: CacheName,
    entries: MokaCache<RequestKey, AssetResponse>,
}

impl InMemoryCacheStore {
    pub fn new(name: CacheName) -> Self {
        Self {
            name,
            entries: MokaCache::builder().build(),
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    fn name(&self) -> &CacheName {
        &self.name
    }

    async fn get(&self, key: &RequestKey) -> Result<Option<AssetResponse>, DomainError> {
        Ok(self.entries.get(key).await)
    }

    async fn put(&self, key: RequestKey, response: AssetResponse) -> Result<(), DomainError> {
        ensure_storable(&key)?;
        self.entries.insert(key, response).await;
        Ok(())
    }

    async fn put_all(&self, entries: Vec<(RequestKey, AssetResponse)>) -> Result<(), DomainError> {
        // Validate the whole batch before the first insert
        for (key, _) in &entries {
            ensure_storable(key)?;
        }

        for (key, response) in entries {
            self.entries.insert(key, response).await;
        }

        Ok(())
    }

    async fn keys(&self) -> Result<Vec<RequestKey>, DomainError> {
        let mut keys: Vec<RequestKey> = self
            .entries
            .iter()
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.entries.iter().count())
    }
}

/// All cache generations for one site, in creation order
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    stores: RwLock<Vec<Arc<InMemoryCacheStore>>>,
}

impl InMemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, name: &CacheName) -> Result<Arc<dyn CacheStore>, DomainError> {
        if let Some(store) = self.stores.read().await.iter().find(|s| &s.name == name) {
            return Ok(store.clone());
        }

        let mut stores = self.stores.write().await;

        // Another opener may have won the race for the write lock
        if let Some(store) = stores.iter().find(|s| &s.name == name) {
            return Ok(store.clone());
        }

        let store = Arc::new(InMemoryCacheStore::new(name.clone()));
        stores.push(store.clone());
        Ok(store)
    }

    async fn lookup(&self, name: &CacheName) -> Result<Option<Arc<dyn CacheStore>>, DomainError> {
        Ok(self
            .stores
            .read()
            .await
            .iter()
            .find(|s| &s.name == name)
            .map(|s| s.clone() as Arc<dyn CacheStore>))
    }

    async fn has(&self, name: &CacheName) -> Result<bool, DomainError> {
        Ok(self.stores.read().await.iter().any(|s| &s.name == name))
    }

    async fn delete(&self, name: &CacheName) -> Result<bool, DomainError> {
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|s| &s.name != name);
        Ok(stores.len() != before)
    }

    async fn keys(&self) -> Result<Vec<CacheName>, DomainError> {
        Ok(self
            .stores
            .read()
            .await
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }
}
