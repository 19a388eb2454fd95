//! In-memory implementation of `Storage`.
//!
//! Each call takes the lock once and releases it before returning, so
//! multi-step workflows interleave exactly like they do against SQLite.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::Storage;
use crate::domain::client::{Client, ClientFilter, ClientId, ClientInput};
use crate::domain::request::{NewRequest, Request, RequestFilter, RequestId, RequestStatus};
use crate::domain::worker::{Worker, WorkerId, WorkerInput, WorkerReport};
use crate::error::{LetterhouseError, Result};

#[derive(Debug, Default)]
struct Tables {
    workers: Vec<Worker>,
    clients: Vec<Client>,
    requests: Vec<Request>,
    next_worker_id: i64,
    next_client_id: i64,
    next_request_id: i64,
}

/// Vector-backed storage. Ids start at 1 and are never reused, like SQLite
/// `AUTOINCREMENT` keys.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_workers(&self) -> Result<Vec<Worker>> {
        Ok(self.tables.lock().workers.clone())
    }

    async fn get_worker(&self, id: WorkerId) -> Result<Worker> {
        self.tables
            .lock()
            .workers
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(LetterhouseError::WorkerNotFound(id))
    }

    async fn create_worker(&self, input: WorkerInput) -> Result<Worker> {
        let mut tables = self.tables.lock();
        let worker = Worker {
            id: WorkerId(next_id(&mut tables.next_worker_id)),
            name: input.name,
            age: input.age,
            active: input.active,
            lifetime_requests: 0,
        };
        tables.workers.push(worker.clone());
        Ok(worker)
    }

    async fn update_worker(&self, id: WorkerId, input: WorkerInput) -> Result<Worker> {
        let mut tables = self.tables.lock();
        let worker = tables
            .workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(LetterhouseError::WorkerNotFound(id))?;
        worker.name = input.name;
        worker.age = input.age;
        worker.active = input.active;
        Ok(worker.clone())
    }

    async fn delete_worker(&self, id: WorkerId) -> Result<()> {
        let mut tables = self.tables.lock();
        let before = tables.workers.len();
        tables.workers.retain(|w| w.id != id);
        if tables.workers.len() == before {
            return Err(LetterhouseError::WorkerNotFound(id));
        }
        Ok(())
    }

    async fn list_active_workers(&self) -> Result<Vec<Worker>> {
        // Insertion order is id order
        Ok(self
            .tables
            .lock()
            .workers
            .iter()
            .filter(|w| w.active)
            .cloned()
            .collect())
    }

    async fn count_requests_for_worker(
        &self,
        worker_id: WorkerId,
        statuses: &[RequestStatus],
    ) -> Result<i64> {
        let count = self
            .tables
            .lock()
            .requests
            .iter()
            .filter(|r| r.worker_id == worker_id && statuses.contains(&r.status))
            .count();
        Ok(count as i64)
    }

    async fn increment_worker_counter(&self, worker_id: WorkerId, delta: i64) -> Result<()> {
        let mut tables = self.tables.lock();
        let worker = tables
            .workers
            .iter_mut()
            .find(|w| w.id == worker_id)
            .ok_or(LetterhouseError::WorkerNotFound(worker_id))?;
        worker.lifetime_requests += delta;
        Ok(())
    }

    async fn worker_report(&self, id: WorkerId) -> Result<WorkerReport> {
        let tables = self.tables.lock();
        let worker = tables
            .workers
            .iter()
            .find(|w| w.id == id)
            .ok_or(LetterhouseError::WorkerNotFound(id))?;

        let assigned: Vec<&Request> = tables
            .requests
            .iter()
            .filter(|r| r.worker_id == id)
            .collect();
        let distinct_clients: HashSet<ClientId> = assigned.iter().map(|r| r.client_id).collect();

        Ok(WorkerReport {
            worker_id: worker.id,
            name: worker.name.clone(),
            total_requests: assigned.len() as i64,
            distinct_clients: distinct_clients.len() as i64,
        })
    }

    async fn list_clients(&self, filter: ClientFilter) -> Result<Vec<Client>> {
        Ok(self
            .tables
            .lock()
            .clients
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get_client(&self, id: ClientId) -> Result<Client> {
        self.tables
            .lock()
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(LetterhouseError::ClientNotFound(id))
    }

    async fn create_client(&self, input: ClientInput) -> Result<Client> {
        let mut tables = self.tables.lock();
        let client = Client {
            id: ClientId(next_id(&mut tables.next_client_id)),
            name: input.name,
            city: input.city,
            reason: input.reason,
            contact: input.contact,
        };
        tables.clients.push(client.clone());
        Ok(client)
    }

    async fn update_client(&self, id: ClientId, input: ClientInput) -> Result<Client> {
        let mut tables = self.tables.lock();
        let client = tables
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LetterhouseError::ClientNotFound(id))?;
        client.name = input.name;
        client.city = input.city;
        client.reason = input.reason;
        client.contact = input.contact;
        Ok(client.clone())
    }

    async fn delete_client(&self, id: ClientId) -> Result<()> {
        let mut tables = self.tables.lock();
        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        if tables.clients.len() == before {
            return Err(LetterhouseError::ClientNotFound(id));
        }
        Ok(())
    }

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<Request>> {
        Ok(self
            .tables
            .lock()
            .requests
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_request(&self, id: RequestId) -> Result<Request> {
        self.tables
            .lock()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(LetterhouseError::RequestNotFound(id))
    }

    async fn insert_request(&self, request: NewRequest) -> Result<Request> {
        let mut tables = self.tables.lock();
        let request = Request {
            id: RequestId(next_id(&mut tables.next_request_id)),
            client_id: request.client_id,
            worker_id: request.worker_id,
            date: request.date,
            status: RequestStatus::Draft,
            content: request.content,
            created_at: Utc::now(),
        };
        tables.requests.push(request.clone());
        Ok(request)
    }

    async fn save_request(&self, request: &Request) -> Result<()> {
        let mut tables = self.tables.lock();
        let stored = tables
            .requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or(LetterhouseError::RequestNotFound(request.id))?;
        stored.status = request.status;
        stored.content = request.content.clone();
        Ok(())
    }

    async fn delete_request_record(&self, id: RequestId) -> Result<()> {
        let mut tables = self.tables.lock();
        let before = tables.requests.len();
        tables.requests.retain(|r| r.id != id);
        if tables.requests.len() == before {
            return Err(LetterhouseError::RequestNotFound(id));
        }
        Ok(())
    }
}
