//! Command and Query handlers implementing the CQRS pattern
//!
//! Handler traits return `impl Future + Send`, matching the registry ports,
//! so handlers can be driven from axum on a multi-threaded runtime without
//! boxing.

pub mod command_handlers;
pub mod query_handlers;

use std::future::Future;

use crate::application::ApplicationResult;

/// Command handler trait
pub trait CommandHandler<TCommand> {
    /// The response type for this command
    type Response;

    /// Handle the command
    fn handle(
        &self,
        command: TCommand,
    ) -> impl Future<Output = ApplicationResult<Self::Response>> + Send;
}

/// Query handler trait
pub trait QueryHandler<TQuery> {
    /// The response type for this query
    type Response;

    /// Handle the query
    fn handle(&self, query: TQuery)
    -> impl Future<Output = ApplicationResult<Self::Response>> + Send;
}
