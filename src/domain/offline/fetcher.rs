//! Network access seen from the worker

use std::fmt::Debug;

use async_trait::async_trait;

use super::request::{AssetRequest, AssetResponse};
use crate::domain::DomainError;

/// Performs the real network fetch for a request.
///
/// Transport failures are `DomainError::Upstream`; any HTTP status, including
/// errors, is a successful fetch.
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::offline::request::ResponseType;

    /// Scripted fetcher that records every URL it is asked for
    #[derive(Debug, Default)]
    pub struct MockFetcher {
        responses: Mutex<HashMap<String, AssetResponse>>,
        failures: Mutex<HashMap<String, String>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Respond to `url` with a same-origin 200
        pub fn with_ok(self, url: &str, body: &str) -> Self {
            self.with_response(AssetResponse::new(url, 200, body.to_string()))
        }

        pub fn with_response(self, response: AssetResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(response.url.clone(), response);
            self
        }

        pub fn with_typed(self, url: &str, status: u16, response_type: ResponseType) -> Self {
            self.with_response(AssetResponse::new(url, status, "").with_type(response_type))
        }

        pub fn with_failure(self, url: &str, message: &str) -> Self {
            self.failures
                .lock()
                .unwrap()
                .insert(url.to_string(), message.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }

        pub fn reset_calls(&self) {
            self.calls.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, DomainError> {
            let url = request.url.to_string();
            self.calls.lock().unwrap().push(url.clone());

            if let Some(message) = self.failures.lock().unwrap().get(&url) {
                return Err(DomainError::upstream("network", message.clone()));
            }

            self.responses
                .lock()
                .unwrap()
                .get(&url)
                .cloned()
                .ok_or_else(|| DomainError::upstream("network", format!("No mock response for {}", url)))
        }
    }
}
