//! Per-client rate limiting middleware

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::types::ApiError;
use crate::infrastructure::rate_limit::RateLimiter;

pub const GLOBAL_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const CONTACT_LIMIT_MESSAGE: &str =
    "Too many contact form submissions, please try again later.";

/// A limiter together with the error it answers with
#[derive(Debug, Clone)]
pub struct RateLimitGuard {
    limiter: Arc<RateLimiter>,
    message: &'static str,
}

impl RateLimitGuard {
    pub fn new(limiter: Arc<RateLimiter>, message: &'static str) -> Self {
        Self { limiter, message }
    }
}

/// Reject with 429 once the client has used up its window
pub async fn rate_limit_middleware(
    State(guard): State<RateLimitGuard>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    let result = guard.limiter.check_and_record(&client).await;

    if !result.allowed {
        warn!(client = %client, limit = result.limit, "Rate limit exceeded");

        let mut response = ApiError::rate_limited(guard.message).into_response();
        insert_limit_headers(&mut response, result.limit, 0, result.reset_in_seconds);
        return response;
    }

    let mut response = next.run(request).await;
    insert_limit_headers(
        &mut response,
        result.limit,
        result.remaining,
        result.reset_in_seconds,
    );
    response
}

fn insert_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset: u64) {
    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(reset));
}

/// First `x-forwarded-for` hop, then the socket peer
pub fn client_ip(request: &Request<Body>) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
