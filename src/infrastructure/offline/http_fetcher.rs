//! Network fetcher for the offline worker, backed by reqwest

use async_trait::async_trait;
use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use reqwest::{Client, Method};
use url::Url;

use crate::domain::offline::{AssetRequest, AssetResponse, Fetcher, ResponseType};
use crate::domain::DomainError;

/// Headers that describe the hop, not the resource
const HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "host",
];

/// Fetches on behalf of a site, classifying responses by origin
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url) -> Self {
        Self::with_client(Client::new(), origin)
    }

    pub fn with_client(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }

    fn classify(&self, url: &Url, headers: &reqwest::header::HeaderMap) -> ResponseType {
        if url.origin() == self.origin.origin() {
            return ResponseType::Basic;
        }

        let site = self.origin.origin().ascii_serialization();
        let shared = headers
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "*" || v == site)
            .unwrap_or(false);

        if shared {
            ResponseType::Cors
        } else {
            ResponseType::Opaque
        }
    }
}

fn is_hop_header(name: &str) -> bool {
    HOP_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, DomainError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| DomainError::validation(format!("Invalid method '{}': {}", request.method, e)))?;

        let mut builder = self.client.request(method, request.url.clone());

        for (name, value) in &request.headers {
            if !is_hop_header(name) {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::upstream("network", format!("Request failed: {}", e)))?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let response_type = self.classify(&final_url, response.headers());

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter(|(name, _)| !is_hop_header(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::upstream("network", format!("Failed to read body: {}", e)))?;

        Ok(AssetResponse {
            url: final_url.to_string(),
            status,
            headers,
            body,
            response_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_same_origin_is_basic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let origin = Url::parse(&server.uri()).unwrap();
        let fetcher = HttpFetcher::new(origin.clone());
        let request = AssetRequest::get(origin.join("/index.html").unwrap());

        let response = fetcher.fetch(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.response_type, ResponseType::Basic);
        assert_eq!(response.body, "<html></html>");
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert!(response.is_cacheable());
    }

    #[tokio::test]
    async fn test_cross_origin_classification() {
        let cdn = MockServer::start().await;
        Mock::given(path("/shared.css"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("access-control-allow-origin", "*"),
            )
            .mount(&cdn)
            .await;
        Mock::given(path("/private.js"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&cdn)
            .await;

        let fetcher = HttpFetcher::new(Url::parse("https://site.test").unwrap());
        let base = Url::parse(&cdn.uri()).unwrap();

        let shared = fetcher
            .fetch(&AssetRequest::get(base.join("/shared.css").unwrap()))
            .await
            .unwrap();
        assert_eq!(shared.response_type, ResponseType::Cors);
        assert!(shared.is_precacheable());
        assert!(!shared.is_cacheable());

        let private = fetcher
            .fetch(&AssetRequest::get(base.join("/private.js").unwrap()))
            .await
            .unwrap();
        assert_eq!(private.response_type, ResponseType::Opaque);
        assert!(!private.is_precacheable());
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(path("/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let origin = Url::parse(&server.uri()).unwrap();
        let fetcher = HttpFetcher::new(origin.clone());

        let response = fetcher
            .fetch(&AssetRequest::get(origin.join("/missing.png").unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_cacheable());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream_error() {
        let fetcher = HttpFetcher::new(Url::parse("http://127.0.0.1:9").unwrap());
        let result = fetcher
            .fetch(&AssetRequest::parse_get("http://127.0.0.1:9/").unwrap())
            .await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }

    #[test]
    fn test_hop_headers() {
        assert!(is_hop_header("Connection"));
        assert!(is_hop_header("host"));
        assert!(!is_hop_header("content-type"));
    }
}
