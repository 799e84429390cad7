//! Mirror pool abstractions and implementations.
//!
//! A registry of interchangeable Piped-compatible servers, an HTTP transport
//! that asks one of them for audio streams, and the resolver that walks the
//! pool in random order until a mirror produces a usable stream.

pub mod client;
pub mod registry;
pub mod resolver;
pub mod types;

// Re-export public API
pub use client::HttpMirrorTransport;
pub use registry::{MirrorEndpoint, MirrorRegistry};
pub use resolver::{MirrorPool, ResolutionOutcome, ResolvedStream, select_candidate};
pub use types::{MirrorMiss, MirrorTransport, StreamCandidate};
