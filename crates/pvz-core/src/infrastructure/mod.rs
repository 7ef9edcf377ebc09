//! Infrastructure layer - storage adapters and transports
//!
//! Implements the domain ports for concrete technologies.

pub mod adapters;

#[cfg(feature = "http-server")]
pub mod http;
