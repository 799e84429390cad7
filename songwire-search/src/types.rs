//! Data types for track search functionality.

use serde::{Deserialize, Serialize};
use songwire_core::CanonicalId;

/// Category filter applied to a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchFilter {
    /// Official song uploads only, excluding covers and fan videos
    Songs,
}

/// One ranked result as returned by a search provider.
///
/// The identifier is optional because the oracle can rank albums, artists or
/// playlists above songs in an unfiltered query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Video identifier, when the result is playable
    pub video_id: Option<String>,
    /// Display title
    pub title: String,
    /// Contributing artist names in credit order
    pub artists: Vec<String>,
}

impl SearchHit {
    /// Creates a playable hit.
    pub fn song(video_id: impl Into<String>, title: impl Into<String>, artists: &[&str]) -> Self {
        Self {
            video_id: Some(video_id.into()),
            title: title.into(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Best match for a query, with the identifier mirrors are asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMatch {
    /// Canonical identifier of the track
    pub id: CanonicalId,
    /// Display title
    pub title: String,
    /// Contributing artist names in credit order
    pub artists: Vec<String>,
}

impl TrackMatch {
    /// Artists joined for display, e.g. `Queen, David Bowie`.
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}
