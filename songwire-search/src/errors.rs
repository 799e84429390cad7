//! Error types for track search functionality.

use thiserror::Error;

/// Errors that can occur while querying the search oracle.
///
/// None of these reach HTTP clients directly: the identifier resolver
/// collapses every variant into "no match".
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search operation failed with the specified query and reason.
    #[error("Search failed for query '{query}': {reason}")]
    SearchFailed {
        /// The search query that failed
        query: String,
        /// The reason for the failure
        reason: String,
    },

    /// Network communication error occurred during search.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// Failed to parse search results or response data.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// Provider could not be constructed.
    #[error("Provider setup failed: {reason}")]
    ProviderSetup {
        /// The reason for the setup failure
        reason: String,
    },
}
