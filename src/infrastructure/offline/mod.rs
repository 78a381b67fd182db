//! Offline cache infrastructure - storage and network implementations

mod http_fetcher;
mod in_memory;

pub use http_fetcher::HttpFetcher;
pub use in_memory::{InMemoryCacheStorage, InMemoryCacheStore};
