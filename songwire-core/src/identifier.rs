//! Canonical content identifiers shared between search and mirror resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a piece of content, such as a YouTube video id.
///
/// Produced by the search side and consumed by the mirror pool. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Creates identifier from a raw token, rejecting blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CanonicalId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "canonical id must not be empty".to_string())
    }
}

impl From<CanonicalId> for String {
    fn from(id: CanonicalId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identifier_rejected() {
        assert!(CanonicalId::new("").is_none());
        assert!(CanonicalId::new("   ").is_none());
    }

    #[test]
    fn test_identifier_is_opaque() {
        let id = CanonicalId::new("fJ9rUzIMcZQ").unwrap();
        assert_eq!(id.as_str(), "fJ9rUzIMcZQ");
        assert_eq!(id.to_string(), "fJ9rUzIMcZQ");
    }

    #[test]
    fn test_serde_rejects_empty() {
        let parsed: Result<CanonicalId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: CanonicalId = serde_json::from_str("\"X1\"").unwrap();
        assert_eq!(parsed.as_str(), "X1");
    }
}
