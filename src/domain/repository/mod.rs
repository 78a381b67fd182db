//! Repository listing from a source-hosting service

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The fields of a hosted repository the portfolio shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub updated_at: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// Lists the most recently updated repositories of the configured account
#[async_trait]
pub trait RepositorySource: Send + Sync + Debug {
    async fn latest(&self) -> Result<Vec<RepositorySummary>, DomainError>;
}
