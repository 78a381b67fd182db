//! Offline cache worker: install, activate and cache-first fetch handling

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::fetcher::Fetcher;
use super::lifecycle::{LifecycleEvent, WorkerPhase};
use super::manifest::{CacheName, WorkerManifest};
use super::request::{AssetRequest, AssetResponse, RequestKey};
use super::storage::{CacheStorage, CacheStore};
use crate::domain::DomainError;

/// Where a fetch outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Network,
}

/// What happened to the cache on a network response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    /// Served from cache, or response not eligible for caching
    Skipped,
    Stored,
    /// Write attempted and failed; the response is still returned
    Failed,
}

/// Result of a fetch that produced a response
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: AssetResponse,
    pub source: ResponseSource,
    pub cache_write: CacheWrite,
}

/// One deployed version of the offline cache worker
#[derive(Debug)]
pub struct OfflineWorker {
    manifest: WorkerManifest,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    phase: RwLock<WorkerPhase>,
}

impl OfflineWorker {
    pub fn new(
        manifest: WorkerManifest,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            manifest,
            storage,
            fetcher,
            phase: RwLock::new(WorkerPhase::Parsed),
        }
    }

    pub fn cache_name(&self) -> &CacheName {
        self.manifest.cache_name()
    }

    pub fn manifest(&self) -> &WorkerManifest {
        &self.manifest
    }

    pub async fn phase(&self) -> WorkerPhase {
        *self.phase.read().await
    }

    async fn advance(&self, event: LifecycleEvent) -> Result<WorkerPhase, DomainError> {
        let mut phase = self.phase.write().await;
        let next = phase.transition(event)?;

        debug!(cache = %self.cache_name(), from = %*phase, to = %next, "Worker phase change");
        *phase = next;

        Ok(next)
    }

    /// Preload every allowlisted URL into this worker's generation.
    ///
    /// All-or-nothing: if any fetch fails or returns an unusable response,
    /// nothing is stored, a store created by this attempt is removed and the
    /// worker becomes redundant.
    pub async fn install(&self) -> Result<(), DomainError> {
        self.advance(LifecycleEvent::InstallStarted).await?;

        match self.precache().await {
            Ok(count) => {
                self.advance(LifecycleEvent::InstallSucceeded).await?;
                info!(cache = %self.cache_name(), entries = count, "Cache installed");
                Ok(())
            }
            Err(e) => {
                warn!(cache = %self.cache_name(), error = %e, "Cache installation failed");
                self.advance(LifecycleEvent::InstallFailed).await?;
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<usize, DomainError> {
        let name = self.cache_name();
        let existed = self.storage.has(name).await?;
        let store = self.storage.open(name).await?;

        match self.fetch_precache_batch().await {
            Ok(entries) => {
                let count = entries.len();
                store.put_all(entries).await?;
                Ok(count)
            }
            Err(e) => {
                if !existed {
                    if let Err(cleanup) = self.storage.delete(name).await {
                        warn!(cache = %name, error = %cleanup, "Failed to discard partial cache");
                    }
                }
                Err(e)
            }
        }
    }

    async fn fetch_precache_batch(&self) -> Result<Vec<(RequestKey, AssetResponse)>, DomainError> {
        let fetches = self.manifest.precache().iter().map(|url| async move {
            let request = AssetRequest::get(url.clone());
            let response = self.fetcher.fetch(&request).await?;

            if !response.is_precacheable() {
                return Err(DomainError::cache(format!(
                    "Precache of {} returned unusable response (status {}, {:?})",
                    url, response.status, response.response_type
                )));
            }

            Ok((request.key(), response))
        });

        try_join_all(fetches).await
    }

    /// Take control: remove every generation other than this worker's.
    pub async fn activate(&self) -> Result<(), DomainError> {
        self.advance(LifecycleEvent::ActivateStarted).await?;

        match self.purge_stale_generations().await {
            Ok(purged) => {
                self.advance(LifecycleEvent::ActivateSucceeded).await?;
                info!(cache = %self.cache_name(), purged = purged, "Worker activated");
                Ok(())
            }
            Err(e) => {
                warn!(cache = %self.cache_name(), error = %e, "Activation failed");
                self.advance(LifecycleEvent::ActivateFailed).await?;
                Err(e)
            }
        }
    }

    async fn purge_stale_generations(&self) -> Result<usize, DomainError> {
        let current = self.cache_name();
        let mut purged = 0;

        for name in self.storage.keys().await? {
            if &name != current {
                self.storage.delete(&name).await?;
                debug!(cache = %name, "Deleted stale cache generation");
                purged += 1;
            }
        }

        Ok(purged)
    }

    /// Mark this worker as superseded by a newer version
    pub async fn retire(&self) -> Result<(), DomainError> {
        self.advance(LifecycleEvent::Replaced).await.map(|_| ())
    }

    /// Cache-first fetch handling.
    ///
    /// Network failures are returned unchanged. While not activated the
    /// worker does not intercept and every request goes to the network.
    /// Cache failures never fail the fetch, and a generation that has been
    /// purged is neither read nor recreated.
    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<FetchOutcome, DomainError> {
        if !self.phase().await.is_serving() {
            return self.network_only(request).await;
        }

        let key = request.key();
        let store = self.current_store().await;

        if let Some(store) = &store {
            match store.get(&key).await {
                Ok(Some(response)) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(FetchOutcome {
                        response,
                        source: ResponseSource::Cache,
                        cache_write: CacheWrite::Skipped,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(key = %key, error = %e, "Cache lookup failed"),
            }
        }

        let response = self.fetcher.fetch(request).await?;

        let store = match store {
            Some(store) if key.is_get() && response.is_cacheable() => store,
            _ => {
                return Ok(FetchOutcome {
                    response,
                    source: ResponseSource::Network,
                    cache_write: CacheWrite::Skipped,
                })
            }
        };

        let cache_write = match store.put(key.clone(), response.clone()).await {
            Ok(()) => CacheWrite::Stored,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache write failed");
                CacheWrite::Failed
            }
        };

        Ok(FetchOutcome {
            response,
            source: ResponseSource::Network,
            cache_write,
        })
    }

    /// This worker's generation, if it still exists
    async fn current_store(&self) -> Option<Arc<dyn CacheStore>> {
        match self.storage.lookup(self.cache_name()).await {
            Ok(Some(store)) => Some(store),
            Ok(None) => {
                debug!(cache = %self.cache_name(), "Generation no longer present");
                None
            }
            Err(e) => {
                warn!(cache = %self.cache_name(), error = %e, "Cache open failed");
                None
            }
        }
    }

    async fn network_only(&self, request: &AssetRequest) -> Result<FetchOutcome, DomainError> {
        let response = self.fetcher.fetch(request).await?;

        Ok(FetchOutcome {
            response,
            source: ResponseSource::Network,
            cache_write: CacheWrite::Skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::offline::fetcher::mock::MockFetcher;
    use crate::domain::offline::request::ResponseType;
    use crate::infrastructure::offline::InMemoryCacheStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    const ORIGIN: &str = "https://site.test";

    fn manifest(name: &str, entries: &[&str]) -> WorkerManifest {
        WorkerManifest::new(CacheName::new(name).unwrap(), ORIGIN, entries.iter().copied()).unwrap()
    }

    fn site_fetcher() -> MockFetcher {
        MockFetcher::new()
            .with_ok("https://site.test/", "<html>home</html>")
            .with_ok("https://site.test/css/custom.css", "body{}")
    }

    fn worker(
        name: &str,
        storage: &Arc<InMemoryCacheStorage>,
        fetcher: &Arc<MockFetcher>,
    ) -> OfflineWorker {
        OfflineWorker::new(
            manifest(name, &["/", "/css/custom.css"]),
            storage.clone(),
            fetcher.clone(),
        )
    }

    async fn active_worker(
        storage: &Arc<InMemoryCacheStorage>,
        fetcher: &Arc<MockFetcher>,
    ) -> OfflineWorker {
        let worker = worker("v1", storage, fetcher);
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        fetcher.reset_calls();
        worker
    }

    fn get(url: &str) -> AssetRequest {
        AssetRequest::parse_get(url).unwrap()
    }

    /// In-memory storage whose lookups or writes can be made to fail
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: InMemoryCacheStorage,
        fail_lookups: AtomicBool,
        fail_puts: Arc<AtomicBool>,
    }

    impl FlakyStorage {
        fn new() -> Self {
            Self::default()
        }
    }

    #[derive(Debug)]
    struct FlakyStore {
        inner: Arc<dyn CacheStore>,
        fail_puts: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CacheStore for FlakyStore {
        fn name(&self) -> &CacheName {
            self.inner.name()
        }

        async fn get(&self, key: &RequestKey) -> Result<Option<AssetResponse>, DomainError> {
            self.inner.get(key).await
        }

        async fn put(&self, key: RequestKey, response: AssetResponse) -> Result<(), DomainError> {
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(DomainError::cache("quota exceeded"));
            }
            self.inner.put(key, response).await
        }

        async fn put_all(&self, entries: Vec<(RequestKey, AssetResponse)>) -> Result<(), DomainError> {
            self.inner.put_all(entries).await
        }

        async fn keys(&self) -> Result<Vec<RequestKey>, DomainError> {
            self.inner.keys().await
        }

        async fn len(&self) -> Result<usize, DomainError> {
            self.inner.len().await
        }
    }

    #[async_trait]
    impl CacheStorage for FlakyStorage {
        async fn open(&self, name: &CacheName) -> Result<Arc<dyn CacheStore>, DomainError> {
            let inner = self.inner.open(name).await?;
            Ok(Arc::new(FlakyStore {
                inner,
                fail_puts: self.fail_puts.clone(),
            }))
        }

        async fn lookup(&self, name: &CacheName) -> Result<Option<Arc<dyn CacheStore>>, DomainError> {
            if self.fail_lookups.load(Ordering::SeqCst) {
                return Err(DomainError::cache("storage unavailable"));
            }
            Ok(self.inner.lookup(name).await?.map(|inner| {
                Arc::new(FlakyStore {
                    inner,
                    fail_puts: self.fail_puts.clone(),
                }) as Arc<dyn CacheStore>
            }))
        }

        async fn has(&self, name: &CacheName) -> Result<bool, DomainError> {
            self.inner.has(name).await
        }

        async fn delete(&self, name: &CacheName) -> Result<bool, DomainError> {
            self.inner.delete(name).await
        }

        async fn keys(&self) -> Result<Vec<CacheName>, DomainError> {
            self.inner.keys().await
        }
    }

    #[tokio::test]
    async fn test_install_preloads_allowlist() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher());
        let worker = worker("v1", &storage, &fetcher);

        worker.install().await.unwrap();

        assert_eq!(worker.phase().await, WorkerPhase::Installed);
        let store = storage.open(worker.cache_name()).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_install_failure_stores_nothing() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(
            site_fetcher().with_failure("https://site.test/css/custom.css", "connection reset"),
        );
        let worker = worker("v1", &storage, &fetcher);

        let result = worker.install().await;

        assert!(result.is_err());
        assert_eq!(worker.phase().await, WorkerPhase::Redundant);
        assert!(!storage.has(worker.cache_name()).await.unwrap());
        assert!(worker.activate().await.is_err());
    }

    #[tokio::test]
    async fn test_install_rejects_error_status() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_ok("https://site.test/", "home")
                .with_typed("https://site.test/css/custom.css", 404, ResponseType::Basic),
        );
        let worker = worker("v1", &storage, &fetcher);

        assert!(worker.install().await.is_err());
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_failure_keeps_existing_generation() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let name = CacheName::new("v1").unwrap();
        let existing = storage.open(&name).await.unwrap();
        existing
            .put(
                RequestKey::get(&url::Url::parse("https://site.test/old.png").unwrap()),
                AssetResponse::new("https://site.test/old.png", 200, "png"),
            )
            .await
            .unwrap();

        let fetcher = Arc::new(MockFetcher::new().with_failure("https://site.test/", "offline"));
        let worker = worker("v1", &storage, &fetcher);

        assert!(worker.install().await.is_err());
        assert!(storage.has(&name).await.unwrap());
        assert_eq!(existing.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_install_twice_is_rejected() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher());
        let worker = worker("v1", &storage, &fetcher);

        worker.install().await.unwrap();
        let second = worker.install().await;

        assert!(matches!(second, Err(DomainError::Lifecycle { .. })));
        assert_eq!(worker.phase().await, WorkerPhase::Installed);
    }

    #[tokio::test]
    async fn test_activate_purges_other_generations() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        storage.open(&CacheName::new("v0").unwrap()).await.unwrap();
        storage.open(&CacheName::new("scratch").unwrap()).await.unwrap();

        let fetcher = Arc::new(site_fetcher());
        let worker = worker("v1", &storage, &fetcher);
        worker.install().await.unwrap();
        worker.activate().await.unwrap();

        let names = storage.keys().await.unwrap();
        assert_eq!(names, vec![CacheName::new("v1").unwrap()]);
        assert_eq!(worker.phase().await, WorkerPhase::Activated);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher());
        let worker = active_worker(&storage, &fetcher).await;

        let outcome = worker.handle_fetch(&get("https://site.test/")).await.unwrap();

        assert_eq!(outcome.source, ResponseSource::Cache);
        assert_eq!(outcome.response.body, "<html>home</html>");
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_miss_writes_through() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher().with_ok("https://site.test/images/bg_1.jpg", "jpg"));
        let worker = active_worker(&storage, &fetcher).await;
        let request = get("https://site.test/images/bg_1.jpg");

        let first = worker.handle_fetch(&request).await.unwrap();
        assert_eq!(first.source, ResponseSource::Network);
        assert_eq!(first.cache_write, CacheWrite::Stored);

        let second = worker.handle_fetch(&request).await.unwrap();
        assert_eq!(second.source, ResponseSource::Cache);
        assert_eq!(second.response, first.response);
        assert_eq!(fetcher.call_count("https://site.test/images/bg_1.jpg"), 1);
    }

    #[tokio::test]
    async fn test_cross_origin_responses_are_not_cached() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(
            site_fetcher()
                .with_typed("https://cdn.test/opaque.js", 200, ResponseType::Opaque)
                .with_typed("https://cdn.test/cors.js", 200, ResponseType::Cors),
        );
        let worker = active_worker(&storage, &fetcher).await;

        for url in ["https://cdn.test/opaque.js", "https://cdn.test/cors.js"] {
            let request = get(url);
            let outcome = worker.handle_fetch(&request).await.unwrap();
            assert_eq!(outcome.cache_write, CacheWrite::Skipped);

            worker.handle_fetch(&request).await.unwrap();
            assert_eq!(fetcher.call_count(url), 2);
        }
    }

    #[tokio::test]
    async fn test_non_200_passes_through_uncached() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher =
            Arc::new(site_fetcher().with_typed("https://site.test/missing", 404, ResponseType::Basic));
        let worker = active_worker(&storage, &fetcher).await;

        let outcome = worker.handle_fetch(&get("https://site.test/missing")).await.unwrap();

        assert_eq!(outcome.response.status, 404);
        assert_eq!(outcome.cache_write, CacheWrite::Skipped);
        let store = storage.open(worker.cache_name()).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_passes_through() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher().with_failure("https://site.test/live", "timed out"));
        let worker = active_worker(&storage, &fetcher).await;

        let result = worker.handle_fetch(&get("https://site.test/live")).await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_write_failure_still_returns_response() {
        let storage = Arc::new(FlakyStorage::new());
        let fetcher = Arc::new(site_fetcher().with_ok("https://site.test/late.png", "png"));
        let worker = OfflineWorker::new(
            manifest("v1", &["/", "/css/custom.css"]),
            storage.clone(),
            fetcher.clone(),
        );
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        storage.fail_puts.store(true, Ordering::SeqCst);

        let outcome = worker
            .handle_fetch(&get("https://site.test/late.png"))
            .await
            .unwrap();

        assert_eq!(outcome.response.status, 200);
        assert_eq!(outcome.source, ResponseSource::Network);
        assert_eq!(outcome.cache_write, CacheWrite::Failed);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_network() {
        let storage = Arc::new(FlakyStorage::new());
        let fetcher = Arc::new(site_fetcher());
        let worker = OfflineWorker::new(
            manifest("v1", &["/", "/css/custom.css"]),
            storage.clone(),
            fetcher.clone(),
        );
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        fetcher.reset_calls();
        storage.fail_lookups.store(true, Ordering::SeqCst);

        let outcome = worker.handle_fetch(&get("https://site.test/")).await.unwrap();

        assert_eq!(outcome.source, ResponseSource::Network);
        assert_eq!(outcome.cache_write, CacheWrite::Skipped);
        assert_eq!(fetcher.call_count("https://site.test/"), 1);
    }

    #[tokio::test]
    async fn test_non_get_is_not_written() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher().with_ok("https://site.test/api/contact", "{}"));
        let worker = active_worker(&storage, &fetcher).await;

        let request = AssetRequest::new("POST", url::Url::parse("https://site.test/api/contact").unwrap());
        let outcome = worker.handle_fetch(&request).await.unwrap();

        assert_eq!(outcome.response.status, 200);
        assert_eq!(outcome.cache_write, CacheWrite::Skipped);
        let store = storage.open(worker.cache_name()).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_purged_generation_is_not_recreated() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher().with_ok("https://site.test/late.png", "png"));
        let worker = active_worker(&storage, &fetcher).await;

        storage.delete(worker.cache_name()).await.unwrap();
        let outcome = worker
            .handle_fetch(&get("https://site.test/late.png"))
            .await
            .unwrap();

        assert_eq!(outcome.source, ResponseSource::Network);
        assert_eq!(outcome.cache_write, CacheWrite::Skipped);
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_worker_does_not_intercept() {
        let storage = Arc::new(InMemoryCacheStorage::new());
        let fetcher = Arc::new(site_fetcher());
        let worker = worker("v1", &storage, &fetcher);
        worker.install().await.unwrap();

        let outcome = worker.handle_fetch(&get("https://site.test/")).await.unwrap();

        assert_eq!(outcome.source, ResponseSource::Network);
        assert_eq!(fetcher.call_count("https://site.test/"), 2);
    }
}
