//! Letter request desk with worker auto-assignment.
//!
//! Clients commission letters; each new request is assigned to the first
//! active worker holding fewer than five in-flight letters, and then moves
//! through a strictly forward `draft -> reviewed -> sent` workflow.
//!
//! Storage is abstracted behind the [`Storage`] trait, with a SQLite backend
//! for the server binary and an in-memory backend for tests and embedding.
//! [`server::router`] exposes the whole desk over HTTP.

pub mod config;
pub mod domain;
pub mod error;
pub mod manager;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use domain::assignment::{WORKER_CAPACITY, select_worker};
pub use domain::client::{Client, ClientFilter, ClientId, ClientInput};
pub use domain::request::{
    CreateRequest, Request, RequestFilter, RequestId, RequestQuery, RequestStatus, UpdateRequest,
};
pub use domain::worker::{Worker, WorkerId, WorkerInput, WorkerReport};
pub use error::{LetterhouseError, Result};
pub use manager::Storage;
pub use manager::memory::InMemoryStorage;
pub use manager::sqlite::SqliteStorage;

/// Get the letterhouse database migrator
///
/// Returns a migrator that can be run against a connection pool.
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}
