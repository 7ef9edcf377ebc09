//! Application layer - Use cases and orchestration
//!
//! Implements CQRS with separate command and query handlers. Handlers load
//! state through the registry ports, let the domain decide, then persist
//! through the same ports.

pub mod commands;
pub mod handlers;
pub mod queries;

pub use commands::*;
pub use queries::*;

use crate::domain::{DomainError, ErrorKind, PickupPointId, Role};

/// Application Result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Application-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Pickup point {0} has no open reception")]
    NoOpenReception(PickupPointId),
}

impl ApplicationError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::NoOpenReception(_) => ErrorKind::NotFound,
        }
    }
}

/// Metadata every command and query carries
pub trait UseCase {
    /// Name used in logs and metrics
    const NAME: &'static str;

    /// Role the caller must hold; `None` lets any authenticated caller in
    const REQUIRED_ROLE: Option<Role>;

    /// Whether a caller holding `role` may run this use case
    fn permits(role: Role) -> bool {
        Self::REQUIRED_ROLE.is_none_or(|required| required == role)
    }
}
