//! Adapters implementing the registry ports

pub mod generic_store;
pub mod memory_repository;

pub use generic_store::InMemoryStore;
pub use memory_repository::{InMemoryPickupPointRepository, InMemoryReceptionRepository};
