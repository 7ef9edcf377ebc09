//! PVZ Domain Layer - Pure Business Logic
//!
//! This crate contains the domain model for pickup point receptions with no
//! infrastructure dependencies. It owns the reception lifecycle state machine
//! and every invariant that can be checked without touching storage.
//!
//! ## Architecture
//!
//! Following Clean Architecture principles:
//! - **Value Objects**: Immutable, validated domain concepts (City, ItemType, Role, ItemSequence)
//! - **Entities**: Domain objects with identity (PickupPoint, Reception, Item)
//!
//! Cross-aggregate rules (one open reception per pickup point) are enforced by
//! the registry ports defined in `pvz-core`.

#![warn(missing_docs)]

pub mod entities;
pub mod value_objects;

// Re-export core types
pub use entities::{Item, PickupPoint, Reception, ReceptionStatus};
pub use value_objects::{City, ItemId, ItemSequence, ItemType, PickupPointId, ReceptionId, Role};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of domain failures.
///
/// Transports map kinds to status codes; callers use them to tell "bad input"
/// apart from "nothing to remove" without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input rejected by a validator
    Validation,
    /// Referenced entity does not exist
    NotFound,
    /// Business rule violated by the current state
    Conflict,
    /// Remove-last requested on an empty reception
    EmptyState,
    /// Storage or internal failure
    Infrastructure,
}

impl ErrorKind {
    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::EmptyState => "empty_state",
            ErrorKind::Infrastructure => "infrastructure",
        }
    }
}

/// Domain-specific errors
///
/// All domain errors are value types. Uses thiserror for ergonomic error handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// City is not on the allow-list
    #[error("Invalid city: {0} (allowed: Moscow, Saint Petersburg, Kazan)")]
    InvalidCity(String),

    /// Item type is not on the allow-list
    #[error("Invalid item type: {0} (allowed: electronics, clothing, footwear)")]
    InvalidItemType(String),

    /// Unknown user role
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Malformed identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Pickup point not found
    #[error("Pickup point not found: {0}")]
    PickupPointNotFound(PickupPointId),

    /// Reception not found
    #[error("Reception not found: {0}")]
    ReceptionNotFound(ReceptionId),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Pickup point already has an open reception
    #[error("Pickup point {0} already has an open reception")]
    DuplicateOpenReception(PickupPointId),

    /// Close attempted on a closed reception
    #[error("Reception {0} is already closed")]
    AlreadyClosed(ReceptionId),

    /// Mutation attempted on a closed reception
    #[error("Reception {0} is not open")]
    ReceptionNotOpen(ReceptionId),

    /// Remove-last attempted on a reception without items
    #[error("Reception {0} has no items to remove")]
    EmptySequence(ReceptionId),

    /// Stored state changed between read and write
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Internal invariant broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Storage collaborator failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Create an invariant violation error
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCity(_)
            | Self::InvalidItemType(_)
            | Self::InvalidRole(_)
            | Self::InvalidIdentifier(_) => ErrorKind::Validation,
            Self::PickupPointNotFound(_) | Self::ReceptionNotFound(_) | Self::ItemNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::DuplicateOpenReception(_)
            | Self::AlreadyClosed(_)
            | Self::ReceptionNotOpen(_)
            | Self::ConcurrencyConflict(_) => ErrorKind::Conflict,
            Self::EmptySequence(_) => ErrorKind::EmptyState,
            Self::InvariantViolation(_) | Self::Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_creation() {
        let err = DomainError::invariant_violation("test");
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let err = DomainError::storage("connection reset");
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn test_error_kinds() {
        let reception = ReceptionId::new();

        assert_eq!(
            DomainError::InvalidCity("Paris".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            DomainError::PickupPointNotFound(PickupPointId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::AlreadyClosed(reception).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DomainError::EmptySequence(reception).kind(),
            ErrorKind::EmptyState
        );
        assert_eq!(
            DomainError::storage("down").kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_error_messages_name_the_entity() {
        let reception = ReceptionId::new();
        let message = DomainError::ReceptionNotOpen(reception).to_string();
        assert!(message.contains(&reception.to_string()));
    }
}
