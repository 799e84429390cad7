//! HTTP request handlers organized by functionality

pub mod status;
pub mod stream;

// Re-export handler functions
pub use status::{health, status};
pub use stream::{StreamQuery, normalize_query, stream};
