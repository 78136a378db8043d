//! trackcut core - fetch a media source and cut its audio into segments
//!
//! This crate contains all business logic with no front-end
//! dependencies. It can be driven by the CLI or embedded behind an HTTP
//! handler.

pub mod api;
pub mod config;
pub mod extraction;
pub mod fetch;
pub mod logging;
pub mod naming;
pub mod pipeline;
pub mod timeline;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
