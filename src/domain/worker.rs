//! Worker types: the people letter requests are assigned to.

use serde::{Deserialize, Serialize};

use crate::error::{LetterhouseError, Result, require_non_empty};

/// Unique identifier for a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct WorkerId(pub i64);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for WorkerId {
    fn from(id: i64) -> Self {
        WorkerId(id)
    }
}

impl std::ops::Deref for WorkerId {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A registered worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub age: i32,
    /// Inactive workers are never picked for new requests.
    pub active: bool,
    /// Number of requests ever assigned to this worker.
    ///
    /// Historical only: never decremented and not used for eligibility.
    pub lifetime_requests: i64,
}

/// Fields accepted when registering or editing a worker.
///
/// Missing JSON fields fall back to their zero value so that validation, not
/// deserialization, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerInput {
    pub name: String,
    pub age: i32,
    pub active: bool,
}

impl WorkerInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        if self.age <= 0 {
            return Err(LetterhouseError::ValidationError(format!(
                "'age' must be positive, got {}",
                self.age
            )));
        }
        Ok(())
    }
}

/// Per-worker totals served by the report endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker_id: WorkerId,
    pub name: String,
    /// Requests assigned to the worker that still exist, in any status
    pub total_requests: i64,
    pub distinct_clients: i64,
}
