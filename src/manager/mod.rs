//! Storage trait for the letter desk.
//!
//! `Storage` exposes plain persistence primitives for workers, clients and
//! requests. The request workflow (`create_request`, `update_request_status`,
//! `delete_request`) is built on top of those primitives as default methods,
//! so every backend gets the same assignment and lifecycle rules.

use async_trait::async_trait;
use metrics::counter;

use crate::domain::assignment::select_worker;
use crate::domain::client::{Client, ClientFilter, ClientId, ClientInput};
use crate::domain::request::{
    CreateRequest, NewRequest, Request, RequestFilter, RequestId, RequestStatus, UpdateRequest,
    ensure_deletable,
};
use crate::domain::worker::{Worker, WorkerId, WorkerInput, WorkerReport};
use crate::error::Result;

pub mod memory;
pub mod sqlite;

/// Storage trait for persisting and querying the desk's entities.
///
/// Implementations are injected (usually behind an `Arc`) wherever they are
/// needed; there is no process-wide handle.
#[async_trait]
pub trait Storage: Send + Sync {
    // Workers

    /// List every worker, ordered by id.
    async fn list_workers(&self) -> Result<Vec<Worker>>;

    async fn get_worker(&self, id: WorkerId) -> Result<Worker>;

    /// Register a worker. The lifetime counter always starts at zero.
    async fn create_worker(&self, input: WorkerInput) -> Result<Worker>;

    /// Replace a worker's name, age and active flag.
    async fn update_worker(&self, id: WorkerId, input: WorkerInput) -> Result<Worker>;

    async fn delete_worker(&self, id: WorkerId) -> Result<()>;

    /// Active workers ordered by id ascending.
    async fn list_active_workers(&self) -> Result<Vec<Worker>>;

    /// Number of requests assigned to `worker_id` whose status is in `statuses`.
    async fn count_requests_for_worker(
        &self,
        worker_id: WorkerId,
        statuses: &[RequestStatus],
    ) -> Result<i64>;

    /// Add `delta` to the worker's lifetime request counter.
    async fn increment_worker_counter(&self, worker_id: WorkerId, delta: i64) -> Result<()>;

    /// Totals for one worker: all requests still on record and distinct clients.
    async fn worker_report(&self, id: WorkerId) -> Result<WorkerReport>;

    // Clients

    async fn list_clients(&self, filter: ClientFilter) -> Result<Vec<Client>>;

    async fn get_client(&self, id: ClientId) -> Result<Client>;

    async fn create_client(&self, input: ClientInput) -> Result<Client>;

    async fn update_client(&self, id: ClientId, input: ClientInput) -> Result<Client>;

    async fn delete_client(&self, id: ClientId) -> Result<()>;

    // Requests

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<Request>>;

    async fn get_request(&self, id: RequestId) -> Result<Request>;

    /// Insert a new request in `Draft`.
    async fn insert_request(&self, request: NewRequest) -> Result<Request>;

    /// Overwrite the stored status and content of an existing request.
    async fn save_request(&self, request: &Request) -> Result<()>;

    /// Remove a request row unconditionally. Callers enforce the deletion guard.
    async fn delete_request_record(&self, id: RequestId) -> Result<()>;

    // Workflow

    /// Create a request and assign it to the first available worker.
    ///
    /// # Errors
    /// - `ValidationError` if client id, date or content is missing
    /// - `ClientNotFound` if the client does not exist
    /// - `NotAvailable` if every active worker is at capacity
    #[tracing::instrument(skip(self, input), fields(client_id = ?input.client_id))]
    async fn create_request(&self, input: CreateRequest) -> Result<Request> {
        let client_id = input.validate()?;
        self.get_client(client_id).await?;

        let worker = select_worker(self).await?;

        let request = self
            .insert_request(NewRequest {
                client_id,
                worker_id: worker.id,
                date: input.date,
                content: input.content,
            })
            .await?;

        // Not atomic with the selection above
        self.increment_worker_counter(worker.id, 1).await?;

        counter!(
            "letterhouse_requests_assigned_total",
            "worker_id" => worker.id.to_string()
        )
        .increment(1);
        tracing::info!(
            request_id = %request.id,
            worker_id = %worker.id,
            worker = %worker.name,
            "Created request"
        );

        Ok(request)
    }

    /// Move a request one step along draft -> reviewed -> sent, replacing its content.
    ///
    /// # Errors
    /// - `RequestNotFound` if the request does not exist
    /// - `InvalidTransition` for any other status change or an unknown status
    /// - `ValidationError` if the new content is empty
    #[tracing::instrument(skip(self, update), fields(request_id = %id, status = %update.status))]
    async fn update_request_status(&self, id: RequestId, update: UpdateRequest) -> Result<Request> {
        let request = self.get_request(id).await?;
        let request = request.advance(update)?;
        self.save_request(&request).await?;

        tracing::info!(request_id = %id, status = %request.status, "Updated request status");
        Ok(request)
    }

    /// Delete a request, which is only allowed while it is still a draft.
    ///
    /// # Errors
    /// - `RequestNotFound` if the request does not exist
    /// - `DeleteNotAllowed` if it has been reviewed or sent
    #[tracing::instrument(skip(self), fields(request_id = %id))]
    async fn delete_request(&self, id: RequestId) -> Result<()> {
        let request = self.get_request(id).await?;
        ensure_deletable(&request)?;
        self.delete_request_record(id).await?;

        tracing::info!(request_id = %id, "Deleted draft request");
        Ok(())
    }
}
