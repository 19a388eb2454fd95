//! Error types for the letter desk.

use thiserror::Error;

use crate::domain::client::ClientId;
use crate::domain::request::{RequestId, RequestStatus};
use crate::domain::worker::WorkerId;

/// Result type alias using the letterhouse error type.
pub type Result<T> = std::result::Result<T, LetterhouseError>;

/// Main error type for the letter desk.
///
/// Every variant except the infrastructure ones (`Database`, `Migration`,
/// `Other`) is an expected, caller-facing outcome.
#[derive(Error, Debug)]
pub enum LetterhouseError {
    /// A required field is missing or out of range
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Worker not found: {0}")]
    WorkerNotFound(WorkerId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Request not found: {0}")]
    RequestNotFound(RequestId),

    /// Every active worker already holds `capacity` in-flight requests
    #[error("No workers available (maximum {capacity} in-flight requests per worker)")]
    NotAvailable { capacity: i64 },

    /// Illegal status change, or a status value outside draft/reviewed/sent
    #[error(
        "Invalid state transition: request {id} is '{from}', cannot move to '{to}' (draft -> reviewed -> sent)"
    )]
    InvalidTransition {
        id: RequestId,
        from: RequestStatus,
        to: String,
    },

    #[error("Request {id} is '{status}'; only draft requests can be deleted")]
    DeleteNotAllowed { id: RequestId, status: RequestStatus },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LetterhouseError {
    /// Returns true for the caller-facing outcomes (everything but storage faults).
    pub fn is_client_error(&self) -> bool {
        match self {
            LetterhouseError::ValidationError(_)
            | LetterhouseError::WorkerNotFound(_)
            | LetterhouseError::ClientNotFound(_)
            | LetterhouseError::RequestNotFound(_)
            | LetterhouseError::NotAvailable { .. }
            | LetterhouseError::InvalidTransition { .. }
            | LetterhouseError::DeleteNotAllowed { .. } => true,
            LetterhouseError::Database(_) | LetterhouseError::Migration(_) => false,
            LetterhouseError::Other(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LetterhouseError::WorkerNotFound(_)
                | LetterhouseError::ClientNotFound(_)
                | LetterhouseError::RequestNotFound(_)
        )
    }
}

/// Returns a `ValidationError` when `value` is empty or whitespace-only.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LetterhouseError::ValidationError(format!(
            "'{field}' is required"
        )));
    }
    Ok(())
}
