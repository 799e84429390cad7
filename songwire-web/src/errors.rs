//! Error types for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failures reported to HTTP clients.
///
/// Every variant renders as a JSON body of the form `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Query parameter missing or blank after normalization
    #[error("Query empty")]
    EmptyQuery,

    /// Search oracle produced no playable match
    #[error("Song not found on YouTube Music")]
    SongNotFound,

    /// Every mirror in the pool missed
    #[error("Stream unavailable")]
    StreamUnavailable,
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyQuery => StatusCode::BAD_REQUEST,
            ApiError::SongNotFound => StatusCode::NOT_FOUND,
            ApiError::StreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Server lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Listener could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address the bind was attempted on
        address: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Resolver components could not be built from configuration
    #[error("Failed to initialize: {reason}")]
    Setup {
        /// Description of the failed component
        reason: String,
    },

    /// Server stopped with an I/O error
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
