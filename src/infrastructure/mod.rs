//! Infrastructure layer - External service implementations

pub mod github;
pub mod http;
pub mod logging;
pub mod mail;
pub mod observability;
pub mod offline;
pub mod rate_limit;
pub mod services;
pub mod upload;
