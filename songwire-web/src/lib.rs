//! Songwire Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Turns a free-text song query into a redirect to a playable audio
//! stream, plus liveness and status endpoints for monitoring.

pub mod errors;
pub mod handlers;
pub mod server;

// Re-export main types
pub use errors::{ApiError, ServerError};
pub use server::{AppState, build_router, run_server, serve};
