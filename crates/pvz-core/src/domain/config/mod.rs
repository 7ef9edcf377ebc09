//! Domain configuration module
//!
//! Business constants that shape listing queries. Independent of
//! infrastructure and of runtime configuration.

pub mod limits;

pub use limits::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
