//! Worker registration: which version is in control, which is waiting

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::fetcher::Fetcher;
use super::lifecycle::WorkerPhase;
use super::manifest::CacheName;
use super::request::AssetRequest;
use super::storage::CacheStorage;
use super::worker::{CacheWrite, FetchOutcome, OfflineWorker, ResponseSource};
use crate::domain::DomainError;

/// Snapshot of a registration for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationStatus {
    pub active: Option<WorkerStatus>,
    pub waiting: Option<WorkerStatus>,
    pub caches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatus {
    pub cache_name: String,
    pub phase: WorkerPhase,
    pub precache_entries: usize,
}

/// Tracks the active and waiting worker versions for one site.
///
/// Lifecycle events (register, activate) are serialized; fetches run
/// concurrently against whichever worker is active.
#[derive(Debug)]
pub struct WorkerRegistration {
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Fetcher>,
    active: RwLock<Option<Arc<OfflineWorker>>>,
    waiting: RwLock<Option<Arc<OfflineWorker>>>,
    lifecycle: Mutex<()>,
}

impl WorkerRegistration {
    pub fn new(storage: Arc<dyn CacheStorage>, network: Arc<dyn Fetcher>) -> Self {
        Self {
            storage,
            network,
            active: RwLock::new(None),
            waiting: RwLock::new(None),
            lifecycle: Mutex::new(()),
        }
    }

    /// Install a new worker version. On success it becomes the waiting
    /// worker; on failure it is discarded and the active worker keeps control.
    pub async fn register(&self, worker: Arc<OfflineWorker>) -> Result<(), DomainError> {
        let _guard = self.lifecycle.lock().await;

        if let Err(e) = worker.install().await {
            warn!(cache = %worker.cache_name(), error = %e, "New worker discarded");
            return Err(e);
        }

        let previous = self.waiting.write().await.replace(worker);

        if let Some(previous) = previous {
            previous.retire().await?;
        }

        Ok(())
    }

    /// Promote the waiting worker. The previously active worker is retired
    /// once the new one has purged stale generations.
    pub async fn activate_waiting(&self) -> Result<bool, DomainError> {
        let _guard = self.lifecycle.lock().await;

        let Some(worker) = self.waiting.read().await.clone() else {
            return Ok(false);
        };

        worker.activate().await?;
        self.waiting.write().await.take();

        let previous = self.active.write().await.replace(worker.clone());

        if let Some(previous) = previous {
            previous.retire().await?;
        }

        info!(cache = %worker.cache_name(), "Worker in control");
        Ok(true)
    }

    /// Register then immediately take control
    pub async fn deploy(&self, worker: Arc<OfflineWorker>) -> Result<(), DomainError> {
        self.register(worker).await?;
        self.activate_waiting().await.map(|_| ())
    }

    /// Route a request through the active worker, or straight to the network
    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<FetchOutcome, DomainError> {
        let active = self.active.read().await.clone();

        match active {
            Some(worker) => worker.handle_fetch(request).await,
            None => {
                let response = self.network.fetch(request).await?;
                Ok(FetchOutcome {
                    response,
                    source: ResponseSource::Network,
                    cache_write: CacheWrite::Skipped,
                })
            }
        }
    }

    pub async fn active_cache_name(&self) -> Option<CacheName> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|w| w.cache_name().clone())
    }

    pub async fn status(&self) -> Result<RegistrationStatus, DomainError> {
        let active = self.active.read().await.clone();
        let waiting = self.waiting.read().await.clone();

        Ok(RegistrationStatus {
            active: describe(active).await,
            waiting: describe(waiting).await,
            caches: self
                .storage
                .keys()
                .await?
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
        })
    }
}

async fn describe(worker: Option<Arc<OfflineWorker>>) -> Option<WorkerStatus> {
    let worker = worker?;

    Some(WorkerStatus {
        cache_name: worker.cache_name().to_string(),
        phase: worker.phase().await,
        precache_entries: worker.manifest().precache().len(),
    })
}
