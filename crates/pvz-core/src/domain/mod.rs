//! Domain layer - re-exported model plus registry ports
//!
//! The entities and value objects live in `pvz-domain` so they stay free of
//! infrastructure dependencies. This module adds the ports the application
//! layer drives and the business limits that shape queries.

#[macro_use]
pub mod macros;

pub mod config;
pub mod ports;

pub use pvz_domain::{
    City, DomainError, DomainResult, ErrorKind, Item, ItemId, ItemSequence, ItemType,
    PickupPoint, PickupPointId, Reception, ReceptionId, ReceptionStatus, Role, entities,
    value_objects,
};
