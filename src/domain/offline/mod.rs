//! Offline cache domain - cache-first asset caching with versioned generations
//!
//! A worker version owns one cache generation. Installing preloads the
//! generation's allowlist as a single batch; activating deletes every other
//! generation; once active, fetches are answered from the cache when the
//! exact request is present and written through on same-origin 200 misses.

mod fetcher;
mod lifecycle;
mod manifest;
mod registration;
mod request;
mod storage;
mod worker;

pub use fetcher::Fetcher;
pub use lifecycle::{LifecycleEvent, WorkerPhase};
pub use manifest::{CacheName, WorkerManifest};
pub use registration::{RegistrationStatus, WorkerRegistration, WorkerStatus};
pub use request::{AssetRequest, AssetResponse, RequestKey, ResponseType};
pub use storage::{ensure_storable, CacheStorage, CacheStore};
pub use worker::{CacheWrite, FetchOutcome, OfflineWorker, ResponseSource};

#[cfg(test)]
pub use fetcher::mock::MockFetcher;
