//! # PVZ Core
//!
//! Use cases, registry ports and adapters for the pickup point reception
//! service. The domain model lives in `pvz-domain`; this crate wires it to
//! storage and to the HTTP transport.
//!
//! ## Layout
//!
//! - [`domain`]: re-exported domain model plus the registry ports
//! - [`application`]: commands, queries and their handlers
//! - [`infrastructure`]: in-memory registry and the axum transport
//! - [`config`]: service configuration loaded from the environment

#![warn(rust_2018_idioms)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
mod telemetry;

// Domain layer exports
pub use domain::{
    City, DomainError, DomainResult, ErrorKind, Item, ItemId, ItemSequence, ItemType,
    PickupPoint, PickupPointId, Reception, ReceptionId, ReceptionStatus, Role,
    ports::{PickupPointFilter, PickupPointRepository, Pagination, ReceptionRepository},
};

// Application layer exports
pub use application::{
    ApplicationError, ApplicationResult, UseCase, commands,
    handlers::{
        CommandHandler, QueryHandler, command_handlers::ReceptionCommandHandler,
        query_handlers::ReceptionQueryHandler,
    },
    queries,
};

// Infrastructure exports
pub use infrastructure::adapters::{InMemoryPickupPointRepository, InMemoryReceptionRepository};

#[cfg(feature = "http-server")]
pub use infrastructure::http::{AppState, JwtAuthority, create_router};

// Configuration exports
pub use config::{AuthConfig, HttpConfig, LogConfig, MetricsConfig, ServiceConfig};
