//! Static registry of interchangeable stream mirrors.

use std::collections::HashSet;
use std::fmt;

use crate::identifier::CanonicalId;
use crate::{Result, SongwireError};

/// Base address of one server implementing the `/streams/{id}` API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MirrorEndpoint(String);

impl MirrorEndpoint {
    /// Parses and normalizes a base URL.
    ///
    /// The stored form is the `url` crate's serialization (lowercase host,
    /// default port dropped) without trailing slashes, so equal servers
    /// compare equal.
    ///
    /// # Errors
    /// - `SongwireError::Configuration` - Blank, unparseable, or non-HTTP URL
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(SongwireError::Configuration {
                reason: "mirror URL must not be empty".to_string(),
            });
        }

        let parsed = url::Url::parse(trimmed).map_err(|e| SongwireError::Configuration {
            reason: format!("invalid mirror URL '{trimmed}': {e}"),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SongwireError::Configuration {
                reason: format!("mirror URL '{trimmed}' must use http or https"),
            });
        }

        Ok(Self(parsed.as_str().trim_end_matches('/').to_string()))
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.0
    }

    /// Builds the stream lookup URL for an identifier on this mirror.
    pub fn streams_url(&self, id: &CanonicalId) -> String {
        format!("{}/streams/{}", self.0, urlencoding::encode(id.as_str()))
    }
}

impl fmt::Display for MirrorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed, ordered, duplicate-free set of mirror endpoints.
///
/// Built once at startup and shared read-only afterwards. There is no
/// health state: every entry is always a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRegistry {
    endpoints: Vec<MirrorEndpoint>,
}

impl MirrorRegistry {
    /// Creates a registry from base URLs, preserving their order.
    ///
    /// # Errors
    /// - `SongwireError::Configuration` - No endpoints, an invalid endpoint,
    ///   or two entries that normalize to the same address
    pub fn new<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut endpoints = Vec::new();

        for url in urls {
            let endpoint = MirrorEndpoint::parse(url.as_ref())?;
            if !seen.insert(endpoint.clone()) {
                return Err(SongwireError::Configuration {
                    reason: format!("duplicate mirror '{endpoint}'"),
                });
            }
            endpoints.push(endpoint);
        }

        if endpoints.is_empty() {
            return Err(SongwireError::Configuration {
                reason: "mirror registry must contain at least one endpoint".to_string(),
            });
        }

        Ok(Self { endpoints })
    }

    /// Returns endpoints in configured order.
    pub fn endpoints(&self) -> &[MirrorEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
