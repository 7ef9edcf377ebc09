//! HTTP transport built on axum
//!
//! Routes, wire DTOs, bearer-token authentication, middleware and the
//! mapping from application errors to status codes.

pub mod auth;
pub mod axum_adapter;
pub mod dto;
pub mod middleware;

pub use auth::{AuthError, AuthenticatedUser, Claims, JwtAuthority};
pub use axum_adapter::{AppState, HttpError, create_router};
#[cfg(feature = "metrics")]
pub use middleware::HttpMetricsLayer;
