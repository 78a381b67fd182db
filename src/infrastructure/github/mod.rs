//! Repository listing from the GitHub REST API

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::repository::{RepositorySource, RepositorySummary};
use crate::domain::DomainError;
use crate::infrastructure::http::HttpClientTrait;

const USER_AGENT: &str = "portfolio-server";

/// Lists a user's most recently updated public repositories
#[derive(Debug, Clone)]
pub struct GithubRepositorySource {
    client: Arc<dyn HttpClientTrait>,
    api_url: String,
    user: String,
    per_page: u32,
}

impl GithubRepositorySource {
    pub fn new(
        client: Arc<dyn HttpClientTrait>,
        api_url: impl Into<String>,
        user: impl Into<String>,
        per_page: u32,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            user: user.into(),
            per_page,
        }
    }

    pub fn repos_url(&self) -> String {
        format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            self.api_url, self.user, self.per_page
        )
    }
}

#[async_trait]
impl RepositorySource for GithubRepositorySource {
    async fn latest(&self) -> Result<Vec<RepositorySummary>, DomainError> {
        let url = self.repos_url();
        let body = self
            .client
            .get_json(
                &url,
                vec![
                    ("User-Agent", USER_AGENT),
                    ("Accept", "application/vnd.github+json"),
                ],
            )
            .await?;

        let repos: Vec<RepositorySummary> = serde_json::from_value(body).map_err(|e| {
            DomainError::upstream("github", format!("Unexpected repository payload: {}", e))
        })?;

        debug!(user = %self.user, count = repos.len(), "Fetched repositories");
        Ok(repos)
    }
}
