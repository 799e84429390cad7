//! End-to-end tests for Songwire
//!
//! These tests drive the HTTP service over a real socket, with the search
//! oracle and every stream mirror replaced by local HTTP doubles.

#[path = "../common/mod.rs"]
mod common;

mod stream_endpoint;
