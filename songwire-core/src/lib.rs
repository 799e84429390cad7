//! Songwire Core - Mirror-pool stream resolution
//!
//! This crate provides the building blocks shared by every Songwire surface:
//! the canonical identifier type, the mirror registry, the HTTP mirror
//! transport, the mirror-pool resolver, configuration, and tracing setup.

pub mod config;
pub mod identifier;
pub mod mirror;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::SongwireConfig;
pub use identifier::CanonicalId;
pub use mirror::{
    HttpMirrorTransport, MirrorEndpoint, MirrorMiss, MirrorPool, MirrorRegistry, MirrorTransport,
    ResolutionOutcome, ResolvedStream, StreamCandidate,
};

/// Core errors that can bubble up from any Songwire subsystem.
///
/// Only process-level failures live here. Per-mirror failures are
/// absorbed by the resolver and never become a `SongwireError`.
#[derive(Debug, thiserror::Error)]
pub enum SongwireError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SongwireError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            SongwireError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            SongwireError::Io(_) => "File system error occurred".to_string(),
            SongwireError::Http(_) => "Could not set up the HTTP client".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, SongwireError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, SongwireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_is_user_error() {
        let error = SongwireError::Configuration {
            reason: "mirror timeout must be non-zero".to_string(),
        };

        assert!(error.is_user_error());
        assert!(error.user_message().contains("mirror timeout"));
        assert!(error.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_io_error_is_not_user_error() {
        let error = SongwireError::from(std::io::Error::other("disk gone"));
        assert!(!error.is_user_error());
    }
}
