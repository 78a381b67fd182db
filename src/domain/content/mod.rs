//! Content domain - the portfolio's fixed read-only payloads

mod catalog;
mod docs;
mod entity;

pub use catalog::ContentCatalog;
pub use docs::{api_docs, api_index, API_VERSION};
pub use entity::{
    AnalyticsSnapshot, Author, BlogPost, Education, Experience, PageViews, Portfolio, Project,
    Publication, ReferrerVisits, Skill, Skills,
};
