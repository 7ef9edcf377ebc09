//! Generic UUID-based Identifier Value Object
//!
//! Type-safe identifier using phantom types for compile-time differentiation.
//! Uses sealed trait pattern to prevent external marker implementations.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::DomainError;

/// Sealed trait module preventing external implementations
mod private {
    pub trait Sealed {}
}

/// Marker trait for type-safe ID differentiation.
///
/// This trait is sealed - external crates cannot implement it.
pub trait IdMarker: private::Sealed + Send + Sync + 'static {
    /// Human-readable entity name used in error messages
    const ENTITY: &'static str;
}

/// Marker type for pickup point identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupPointMarker;

/// Marker type for reception identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceptionMarker;

/// Marker type for item identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemMarker;

impl private::Sealed for PickupPointMarker {}
impl private::Sealed for ReceptionMarker {}
impl private::Sealed for ItemMarker {}

impl IdMarker for PickupPointMarker {
    const ENTITY: &'static str = "pickup point";
}

impl IdMarker for ReceptionMarker {
    const ENTITY: &'static str = "reception";
}

impl IdMarker for ItemMarker {
    const ENTITY: &'static str = "item";
}

/// Generic UUID-based identifier with phantom type safety.
///
/// The phantom type parameter `T` ensures that different ID types cannot
/// be accidentally mixed:
///
/// ```compile_fail
/// # use pvz_domain::value_objects::{PickupPointId, ReceptionId};
/// let point: PickupPointId = PickupPointId::new();
/// let reception: ReceptionId = point;  // Compile error!
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Create new random identifier
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create identifier from existing UUID
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Parse identifier from its string representation
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidIdentifier`] if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self::from_uuid)
            .map_err(|_| DomainError::InvalidIdentifier(format!("{} id '{s}'", T::ENTITY)))
    }

    /// Get underlying UUID value
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.value
    }
}

impl<T: IdMarker> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(std::any::type_name::<Self>())
            .field(&self.value)
            .finish()
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T: IdMarker> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T: IdMarker> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

/// Type alias for pickup point identifier
pub type PickupPointId = Id<PickupPointMarker>;

/// Type alias for reception identifier
pub type ReceptionId = Id<ReceptionMarker>;

/// Type alias for item identifier
pub type ItemId = Id<ItemMarker>;
