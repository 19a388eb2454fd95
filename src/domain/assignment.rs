//! Worker auto-assignment.
//!
//! New requests go to the active worker with the lowest id that holds fewer
//! than [`WORKER_CAPACITY`] in-flight (draft or reviewed) requests. There is
//! no load balancing beyond that ordering.
//!
//! Selection and the lifetime counter increment are separate storage calls.
//! Two concurrent creations can both see the same worker as eligible, so the
//! capacity can be overshot slightly under concurrent load.

use metrics::counter;

use crate::domain::request::RequestStatus;
use crate::domain::worker::Worker;
use crate::error::{LetterhouseError, Result};
use crate::manager::Storage;

/// Maximum number of in-flight requests a single worker may hold.
pub const WORKER_CAPACITY: i64 = 5;

/// Picks the first eligible worker, or fails with `NotAvailable`.
pub async fn select_worker<S: Storage + ?Sized>(storage: &S) -> Result<Worker> {
    let workers = storage.list_active_workers().await?;

    for worker in workers {
        let in_flight = storage
            .count_requests_for_worker(worker.id, &RequestStatus::IN_FLIGHT)
            .await?;

        if in_flight < WORKER_CAPACITY {
            tracing::debug!(
                worker_id = %worker.id,
                in_flight,
                capacity = WORKER_CAPACITY,
                "Selected worker"
            );
            return Ok(worker);
        }

        tracing::trace!(worker_id = %worker.id, in_flight, "Worker at capacity, skipping");
    }

    counter!("letterhouse_assignment_unavailable_total").increment(1);
    tracing::info!(
        capacity = WORKER_CAPACITY,
        "No worker available for new request"
    );
    Err(LetterhouseError::NotAvailable {
        capacity: WORKER_CAPACITY,
    })
}
