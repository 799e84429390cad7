//! Provider implementations for track search functionality.

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::types::{SearchFilter, SearchHit};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod youtube_music;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockProvider;
pub use youtube_music::YouTubeMusicProvider;

/// Trait for track search providers.
///
/// Implementations return results in the oracle's own ranking; callers treat
/// the first result as authoritative and do no re-ranking.
#[async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug {
    /// Search for tracks by query and optional category filter.
    ///
    /// # Errors
    /// - `SearchError::NetworkError` - Network connectivity issues
    /// - `SearchError::SearchFailed` - Oracle rejected the query
    /// - `SearchError::ParseError` - Response could not be interpreted
    async fn search(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<SearchHit>, SearchError>;
}
