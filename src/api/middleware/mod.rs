//! API middleware components

pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::{
    client_ip, rate_limit_middleware, RateLimitGuard, CONTACT_LIMIT_MESSAGE,
    GLOBAL_LIMIT_MESSAGE,
};
pub use security::{security_headers_middleware, MAX_BODY_SIZE, MULTIPART_OVERHEAD};
