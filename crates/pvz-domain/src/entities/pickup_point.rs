//! Pickup point entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainResult,
    value_objects::{City, PickupPointId},
};

/// Physical location where items are received.
///
/// Created once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPoint {
    id: PickupPointId,
    city: City,
    registered_at: DateTime<Utc>,
}

impl PickupPoint {
    /// Register a pickup point in the named city
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomainError::InvalidCity`] if the city is not on the allow-list.
    pub fn new(city: &str) -> DomainResult<Self> {
        Ok(Self::in_city(city.parse()?))
    }

    /// Register a pickup point in an already validated city
    pub fn in_city(city: City) -> Self {
        Self {
            id: PickupPointId::new(),
            city,
            registered_at: Utc::now(),
        }
    }

    /// Rebuild a pickup point from stored parts
    pub fn restore(id: PickupPointId, city: City, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            city,
            registered_at,
        }
    }

    /// Identifier
    pub fn id(&self) -> PickupPointId {
        self.id
    }

    /// City
    pub fn city(&self) -> City {
        self.city
    }

    /// Registration timestamp
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}
