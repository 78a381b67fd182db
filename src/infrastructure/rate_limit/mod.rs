//! Rate limiter implementation
//!
//! Sliding window request counting per client key (the client IP).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Window length and request ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitRule {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the oldest counted request leaves the window (in seconds)
    pub reset_in_seconds: u64,
}

/// Sliding window rate limiter keyed by client
#[derive(Debug)]
pub struct RateLimiter {
    rule: RateLimitRule,
    /// Per-client request timestamps
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    /// Cleanup interval
    cleanup_interval: Duration,
    /// Last cleanup time
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    pub fn new(rule: RateLimitRule) -> Self {
        Self {
            rule,
            records: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    pub fn rule(&self) -> RateLimitRule {
        self.rule
    }

    /// Check and record in one operation; rejected requests are not counted
    pub async fn check_and_record(&self, key: &str) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;
        let key_records = records.entry(key.to_string()).or_default();

        let window_start = now.checked_sub(self.rule.window).unwrap_or(now);
        key_records.retain(|t| *t > window_start);

        let count = key_records.len() as u32;
        if count >= self.rule.max_requests {
            let reset_in = key_records
                .iter()
                .min()
                .map(|oldest| {
                    self.rule
                        .window
                        .saturating_sub(now.duration_since(*oldest))
                        .as_secs()
                })
                .unwrap_or(self.rule.window.as_secs());

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit: self.rule.max_requests,
                reset_in_seconds: reset_in,
            };
        }

        key_records.push(now);

        RateLimitResult {
            allowed: true,
            remaining: self.rule.max_requests - count - 1,
            limit: self.rule.max_requests,
            reset_in_seconds: self.rule.window.as_secs(),
        }
    }

    /// Reset rate limits for a key
    pub async fn reset(&self, key: &str) {
        let mut records = self.records.write().await;
        records.remove(key);
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if !should_cleanup {
            return;
        }

        let mut last = self.last_cleanup.write().await;
        if last.elapsed() < self.cleanup_interval {
            return;
        }

        let now = Instant::now();
        let window_start = now.checked_sub(self.rule.window).unwrap_or(now);
        let mut records = self.records.write().await;

        records.retain(|_, stamps| {
            stamps.retain(|t| *t > window_start);
            !stamps.is_empty()
        });

        *last = now;
    }
}
