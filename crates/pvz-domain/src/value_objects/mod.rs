//! Domain Value Objects
//!
//! Immutable objects that represent concepts in the domain
//! with no conceptual identity, only defined by their attributes.

mod city;
mod id;
mod item_type;
mod role;
mod sequence;

pub use city::City;
pub use id::{
    Id, IdMarker, ItemId, ItemMarker, PickupPointId, PickupPointMarker, ReceptionId,
    ReceptionMarker,
};
pub use item_type::ItemType;
pub use role::Role;
pub use sequence::ItemSequence;
