//! Identifier resolution from free-text queries.
//!
//! Asks the search oracle for official songs first and only widens the
//! search when that comes back empty. The oracle's top result wins.

use std::sync::Arc;

use songwire_core::CanonicalId;
use songwire_core::config::SearchConfig;

use crate::errors::SearchError;
use crate::providers::{SearchProvider, YouTubeMusicProvider};
use crate::types::{SearchFilter, SearchHit, TrackMatch};

/// Maps a query to the canonical identifier of its best match.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    provider: Arc<dyn SearchProvider>,
}

impl IdentifierResolver {
    /// Creates resolver backed by the given provider.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Creates resolver backed by YouTube Music.
    ///
    /// # Errors
    /// - `SearchError::ProviderSetup` - HTTP client construction failed
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let provider = YouTubeMusicProvider::with_config(config)?;
        Ok(Self::new(Arc::new(provider)))
    }

    /// Resolves `query` to the top-ranked playable track.
    ///
    /// Returns `None` when nothing matches, when the top result is not
    /// playable, or when the oracle fails. Oracle failures are logged and
    /// never retried with the unfiltered search.
    pub async fn resolve(&self, query: &str) -> Option<TrackMatch> {
        let mut hits = match self.provider.search(query, Some(SearchFilter::Songs)).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!("Search error for '{query}': {e}");
                return None;
            }
        };

        if hits.is_empty() {
            tracing::debug!("No song results for '{query}', retrying unfiltered");
            hits = match self.provider.search(query, None).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::error!("Search error for '{query}': {e}");
                    return None;
                }
            };
        }

        let Some(top) = hits.into_iter().next() else {
            tracing::info!("No results for '{query}'");
            return None;
        };

        Self::into_match(top)
    }

    fn into_match(hit: SearchHit) -> Option<TrackMatch> {
        let Some(id) = hit.video_id.and_then(CanonicalId::new) else {
            tracing::info!("Top result '{}' is not playable", hit.title);
            return None;
        };

        let track = TrackMatch {
            id,
            title: hit.title,
            artists: hit.artists,
        };
        tracing::info!(
            "Found: {} by {} (ID: {})",
            track.title,
            track.artist_line(),
            track.id
        );

        Some(track)
    }
}
