//! Domain entities with business logic and invariants

pub mod item;
pub mod pickup_point;
pub mod reception;

pub use item::Item;
pub use pickup_point::PickupPoint;
pub use reception::{Reception, ReceptionStatus};
