//! Portfolio server
//!
//! Backend for a personal portfolio site with support for:
//! - Read-only portfolio, publication, blog and analytics payloads
//! - A rate-limited contact relay backed by an HTTP mail provider
//! - GIS file uploads, canned analysis and GeoJSON sample data
//! - A repository listing proxied from the GitHub API
//! - An offline cache worker that answers site requests cache-first

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::{AppState, RateLimits, RouterOptions};
use domain::content::ContentCatalog;
use domain::upload::UploadPolicy;
use infrastructure::{
    github::GithubRepositorySource,
    http::HttpClient,
    mail::HttpMailer,
    rate_limit::{RateLimitRule, RateLimiter},
    services::{ContactRouting, ContactService, UploadService},
    upload::DiskFileStore,
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let mail_client = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        config.mail.timeout_secs,
    ))?);
    let mailer = Arc::new(HttpMailer::new(
        mail_client,
        config.mail.api_url.clone(),
        config.mail.api_key.clone(),
    ));
    let contact_service = Arc::new(ContactService::new(
        mailer,
        ContactRouting {
            from: config.mail.from.clone(),
            to: config.mail.to.clone(),
        },
    ));

    let upload_policy = UploadPolicy::new(
        config.upload.max_bytes,
        config.upload.allowed_extensions.iter().cloned(),
    );
    let upload_service = Arc::new(UploadService::new(
        upload_policy,
        Arc::new(DiskFileStore::new(config.upload.dir.clone())),
    ));
    info!("Uploads stored in {}", config.upload.dir.display());

    let github_client = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        config.github.timeout_secs,
    ))?);
    let repositories = Arc::new(GithubRepositorySource::new(
        github_client,
        config.github.api_url.clone(),
        config.github.user.clone(),
        config.github.per_page,
    ));

    let rate_limits = RateLimits {
        global: Arc::new(RateLimiter::new(RateLimitRule::new(
            config.rate_limit.global_window(),
            config.rate_limit.global_max,
        ))),
        contact: Arc::new(RateLimiter::new(RateLimitRule::new(
            config.rate_limit.contact_window(),
            config.rate_limit.contact_max,
        ))),
    };

    Ok(AppState::new(
        Arc::new(ContentCatalog::new()),
        contact_service,
        upload_service,
        repositories,
        rate_limits,
        config.content.resume_url.clone(),
    ))
}

/// Router settings derived from configuration.
///
/// The static directory is only used when it exists on disk.
pub fn router_options(config: &AppConfig) -> RouterOptions {
    let static_dir = Some(config.content.static_dir.clone()).filter(|dir| dir.is_dir());

    RouterOptions {
        cors_origins: config.cors.origins(config.server.environment),
        static_dir,
    }
}
