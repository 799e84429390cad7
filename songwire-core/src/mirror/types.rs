//! Mirror communication types and the transport trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::registry::MirrorEndpoint;
use crate::identifier::CanonicalId;

/// One audio stream offered by a mirror for an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCandidate {
    /// Container/codec label as reported by the mirror (e.g. `M4A`)
    pub format: String,
    /// Direct, playable stream URL
    pub url: String,
}

impl StreamCandidate {
    /// Creates a candidate from a format label and URL.
    pub fn new(format: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            url: url.into(),
        }
    }

    /// Checks whether this candidate carries the given format label.
    ///
    /// Mirrors disagree on casing (`m4a` vs `M4A`), so comparison ignores it.
    pub fn has_format(&self, format: &str) -> bool {
        self.format.eq_ignore_ascii_case(format)
    }
}

/// Reason a single mirror attempt produced nothing usable.
///
/// Misses are recoverable: the resolver logs them and moves on to the next
/// mirror. They never reach a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MirrorMiss {
    #[error("no response within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("malformed response: {reason}")]
    Malformed { reason: String },

    #[error("no audio streams in response")]
    Empty,
}

/// Trait for fetching audio streams from one mirror.
///
/// Implementations issue exactly one request per call. Timeouts are enforced
/// by the caller, so implementations may block for as long as the network does.
#[async_trait]
pub trait MirrorTransport: Send + Sync + std::fmt::Debug {
    /// Fetches the audio streams `endpoint` offers for `id`, in response order.
    ///
    /// # Errors
    /// - `MirrorMiss::Transport` - Connection or request failure
    /// - `MirrorMiss::Status` - Mirror answered with a non-200 status
    /// - `MirrorMiss::Malformed` - Body could not be parsed
    /// - `MirrorMiss::Empty` - Response contained no audio streams
    async fn fetch_streams(
        &self,
        endpoint: &MirrorEndpoint,
        id: &CanonicalId,
    ) -> Result<Vec<StreamCandidate>, MirrorMiss>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_match_ignores_case() {
        let candidate = StreamCandidate::new("M4A", "https://cdn.example/a");
        assert!(candidate.has_format("m4a"));
        assert!(!candidate.has_format("webm"));
    }

    #[test]
    fn test_miss_display() {
        assert_eq!(MirrorMiss::Status { status: 503 }.to_string(), "HTTP status 503");
        assert_eq!(MirrorMiss::Empty.to_string(), "no audio streams in response");
    }
}
