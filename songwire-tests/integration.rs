//! Integration tests for Songwire
//!
//! These tests run the real HTTP transports against local HTTP doubles of
//! stream mirrors and the search oracle.

#[path = "common/mod.rs"]
mod common;

#[path = "integration/mirror_transport.rs"]
mod mirror_transport;
#[path = "integration/youtube_music_provider.rs"]
mod youtube_music_provider;
