//! Ports - Domain interfaces for external dependencies
//!
//! Defines the registry contracts that storage adapters implement. The
//! application layer only ever talks to these traits, so the in-memory
//! adapters and any future persistent backend are interchangeable.

pub mod repositories;

pub use repositories::{Pagination, PickupPointFilter, PickupPointRepository, ReceptionRepository};
