#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod jsonapi;
pub mod logging;
pub mod middleware;
pub mod relationships;
pub mod repos;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use config::db::{DbKind, DbOwner, RuntimeEnv};
pub use db::txn::{with_txn, SharedTxn};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use extractors::{JsonApiBody, JsonApiQuery};
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::build_state;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use schema::{RelationDescriptor, ResourceRef, ResourceType};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    linkage_test_support::logging::init();
}
