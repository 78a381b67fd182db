//! Application state for shared services

use std::sync::Arc;
use std::time::Instant;

use crate::domain::content::ContentCatalog;
use crate::domain::repository::RepositorySource;
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::services::{ContactService, UploadService};

/// Per-client limiters applied by the router
#[derive(Debug, Clone)]
pub struct RateLimits {
    pub global: Arc<RateLimiter>,
    pub contact: Arc<RateLimiter>,
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentCatalog>,
    pub contact_service: Arc<ContactService>,
    pub upload_service: Arc<UploadService>,
    pub repositories: Arc<dyn RepositorySource>,
    pub rate_limits: RateLimits,
    pub resume_url: String,
    pub mail_configured: bool,
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        content: Arc<ContentCatalog>,
        contact_service: Arc<ContactService>,
        upload_service: Arc<UploadService>,
        repositories: Arc<dyn RepositorySource>,
        rate_limits: RateLimits,
        resume_url: impl Into<String>,
    ) -> Self {
        Self {
            content,
            mail_configured: contact_service.is_configured(),
            contact_service,
            upload_service,
            repositories,
            rate_limits,
            resume_url: resume_url.into(),
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
pub mod test_support {
    //! State wired to in-memory doubles

    use super::*;
    use crate::domain::contact::MockMailer;
    use crate::domain::repository::mock::MockRepositorySource;
    use crate::domain::upload::UploadPolicy;
    use crate::infrastructure::rate_limit::RateLimitRule;
    use crate::infrastructure::services::ContactRouting;
    use crate::infrastructure::upload::DiskFileStore;
    use std::time::Duration;

    pub const RESUME_URL: &str = "https://files.test/resume.pdf";

    pub struct TestState {
        pub state: AppState,
        pub mailer: Arc<MockMailer>,
        pub repositories: Arc<MockRepositorySource>,
        pub upload_dir: tempfile::TempDir,
    }

    pub fn test_state() -> TestState {
        test_state_with(
            MockMailer::new(),
            MockRepositorySource::with_repos(Vec::new()),
            1000,
            5,
        )
    }

    pub fn test_state_with(
        mailer: MockMailer,
        repositories: MockRepositorySource,
        global_max: u32,
        contact_max: u32,
    ) -> TestState {
        let mailer = Arc::new(mailer);
        let repositories = Arc::new(repositories);
        let upload_dir = tempfile::tempdir().unwrap();

        let contact_service = ContactService::new(
            mailer.clone(),
            ContactRouting {
                from: "site@annan.dev".to_string(),
                to: "owner@annan.dev".to_string(),
            },
        );
        let upload_service = UploadService::new(
            UploadPolicy::default(),
            Arc::new(DiskFileStore::new(upload_dir.path().join("uploads"))),
        );
        let rate_limits = RateLimits {
            global: Arc::new(RateLimiter::new(RateLimitRule::new(
                Duration::from_secs(900),
                global_max,
            ))),
            contact: Arc::new(RateLimiter::new(RateLimitRule::new(
                Duration::from_secs(3600),
                contact_max,
            ))),
        };

        let state = AppState::new(
            Arc::new(ContentCatalog::new()),
            Arc::new(contact_service),
            Arc::new(upload_service),
            repositories.clone(),
            rate_limits,
            RESUME_URL,
        );

        TestState {
            state,
            mailer,
            repositories,
            upload_dir,
        }
    }
}
