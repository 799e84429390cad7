//! Query-to-stream redirect handler

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use songwire_core::ResolutionOutcome;

use crate::errors::ApiError;
use crate::server::AppState;

/// Query string of `GET /stream`.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Free-text song query
    #[serde(default)]
    pub q: Option<String>,
}

/// Strips double quotes and surrounding whitespace.
///
/// Returns `None` when nothing searchable remains.
pub fn normalize_query(raw: &str) -> Option<String> {
    let cleaned = raw.replace('"', "");
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `GET /stream?q=` - redirects to a playable audio stream for the query.
///
/// # Errors
/// - `ApiError::EmptyQuery` - Missing or blank `q`
/// - `ApiError::SongNotFound` - Search produced no playable match
/// - `ApiError::StreamUnavailable` - Every mirror missed
pub async fn stream(
    State(state): State<AppState>,
    Query(params): Query<StreamQuery>,
) -> Result<Response, ApiError> {
    let query = params
        .q
        .as_deref()
        .and_then(normalize_query)
        .ok_or(ApiError::EmptyQuery)?;

    tracing::info!("Searching for: {query}");

    let track = state
        .identifier_resolver
        .resolve(&query)
        .await
        .ok_or(ApiError::SongNotFound)?;

    let stream = match state.mirror_pool.resolve(&track.id).await {
        ResolutionOutcome::Resolved(stream) => stream,
        ResolutionOutcome::Exhausted { attempts } => {
            tracing::error!(
                "All {attempts} mirrors failed for {} ('{query}')",
                track.id
            );
            return Err(ApiError::StreamUnavailable);
        }
    };

    let location = HeaderValue::from_str(&stream.url).map_err(|_| {
        tracing::error!("Mirror {} returned an unusable URL", stream.endpoint);
        ApiError::StreamUnavailable
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(
            normalize_query("  \"Bohemian Rhapsody\" "),
            Some("Bohemian Rhapsody".to_string())
        );
        assert_eq!(
            normalize_query("Say \"Hello\" Again"),
            Some("Say Hello Again".to_string())
        );
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("\"\""), None);
        assert_eq!(normalize_query("  \" \"  "), None);
    }
}
