//! Outbound JSON-over-HTTP client

mod client;

pub use client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use client::mock::{MockHttpClient, RecordedRequest};
