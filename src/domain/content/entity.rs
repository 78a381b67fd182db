//! Read-only portfolio payloads

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub education: Education,
    pub skills: Skills,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Education {
    pub current: String,
    pub previous: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Skills {
    pub frontend: Vec<Skill>,
    pub backend: Vec<Skill>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

impl Skill {
    pub fn new(name: &str, level: u8) -> Self {
        Self {
            name: name.to_string(),
            level: level.min(100),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub period: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Publication {
    pub id: u32,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub status: String,
    pub year: u16,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    /// Minutes
    pub read_time: u32,
}

/// Visitor statistics. Figures are fixed; only the timestamp moves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_visitors: u64,
    pub monthly_visitors: u64,
    pub project_views: u64,
    pub contact_forms: u64,
    pub top_pages: Vec<PageViews>,
    pub referrers: Vec<ReferrerVisits>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageViews {
    pub page: String,
    pub views: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferrerVisits {
    pub source: String,
    pub visits: u64,
}

/// Contact details of the site owner
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
}
