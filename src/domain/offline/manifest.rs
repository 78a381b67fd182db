//! Cache generation names and the worker's precache manifest

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::DomainError;

/// Version-tagged name of one cache generation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheName(String);

impl CacheName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Cache name cannot be empty"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a worker version needs to know about its generation
#[derive(Debug, Clone)]
pub struct WorkerManifest {
    cache_name: CacheName,
    origin: Url,
    precache: Vec<Url>,
}

impl WorkerManifest {
    /// Build a manifest, resolving relative allowlist entries against `origin`
    pub fn new<I, S>(cache_name: CacheName, origin: &str, precache: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origin = Url::parse(origin)
            .map_err(|e| DomainError::validation(format!("Invalid site origin '{}': {}", origin, e)))?;

        if origin.cannot_be_a_base() {
            return Err(DomainError::validation(format!(
                "Site origin '{}' cannot resolve relative URLs",
                origin
            )));
        }

        let mut urls: Vec<Url> = Vec::new();

        for entry in precache {
            let entry = entry.as_ref();
            let url = origin.join(entry).map_err(|e| {
                DomainError::validation(format!("Invalid precache entry '{}': {}", entry, e))
            })?;

            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        Ok(Self {
            cache_name,
            origin,
            precache: urls,
        })
    }

    pub fn cache_name(&self) -> &CacheName {
        &self.cache_name
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn precache(&self) -> &[Url] {
        &self.precache
    }

    /// Whether `url` shares the site's origin
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }
}
