//! Songwire Search - Track search and identifier resolution

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Turns a free-text query into the canonical identifier of the best-matching
//! track using the YouTube Music search API, with a songs-only query first
//! and a broad query as fallback.

pub mod errors;
pub mod providers;
pub mod service;
pub mod types;

// Re-export main types
pub use errors::SearchError;
pub use providers::{SearchProvider, YouTubeMusicProvider};
pub use service::IdentifierResolver;
pub use types::{SearchFilter, SearchHit, TrackMatch};

/// Convenience type alias for Results with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;
