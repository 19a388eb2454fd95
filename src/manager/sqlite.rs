//! SQLite implementation of `Storage`.
//!
//! Backed by a sqlx `SqlitePool`. Queries are runtime-checked so the crate
//! builds without a live database; the schema lives in `./migrations`.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use super::Storage;
use crate::domain::client::{Client, ClientFilter, ClientId, ClientInput};
use crate::domain::request::{NewRequest, Request, RequestFilter, RequestId, RequestStatus};
use crate::domain::worker::{Worker, WorkerId, WorkerInput, WorkerReport};
use crate::error::{LetterhouseError, Result};

const WORKER_COLUMNS: &str = "id, name, age, active, lifetime_requests";
const CLIENT_COLUMNS: &str = "id, name, city, reason, contact";
const REQUEST_COLUMNS: &str = "id, client_id, worker_id, date, status, content, created_at";

/// SQLite-backed storage.
///
/// # Example
/// ```ignore
/// use letterhouse::manager::sqlite::SqliteStorage;
///
/// let storage = SqliteStorage::connect("sqlite://letterhouse.db?mode=rwc", 5).await?;
/// let workers = storage.list_workers().await?;
/// ```
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Wrap an existing pool. The schema must already be migrated.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `url` and run pending migrations.
    ///
    /// `sqlite::memory:` databases are per-connection, so pass
    /// `max_connections = 1` for them.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL '{url}'"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        crate::migrator().run(&pool).await?;
        tracing::info!(url, max_connections, "Connected to SQLite");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn list_workers(&self) -> Result<Vec<Worker>> {
        let workers = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(workers)
    }

    async fn get_worker(&self, id: WorkerId) -> Result<Worker> {
        sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LetterhouseError::WorkerNotFound(id))
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    async fn create_worker(&self, input: WorkerInput) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "INSERT INTO workers (name, age, active, lifetime_requests) VALUES (?, ?, ?, 0) \
             RETURNING {WORKER_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.age)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(worker_id = %worker.id, "Registered worker");
        Ok(worker)
    }

    #[tracing::instrument(skip(self, input), fields(worker_id = %id))]
    async fn update_worker(&self, id: WorkerId, input: WorkerInput) -> Result<Worker> {
        sqlx::query_as::<_, Worker>(&format!(
            "UPDATE workers SET name = ?, age = ?, active = ? WHERE id = ? \
             RETURNING {WORKER_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.age)
        .bind(input.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LetterhouseError::WorkerNotFound(id))
    }

    #[tracing::instrument(skip(self), fields(worker_id = %id))]
    async fn delete_worker(&self, id: WorkerId) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM workers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(LetterhouseError::WorkerNotFound(id));
        }
        Ok(())
    }

    async fn list_active_workers(&self) -> Result<Vec<Worker>> {
        let workers = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE active = 1 ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(workers)
    }

    async fn count_requests_for_worker(
        &self,
        worker_id: WorkerId,
        statuses: &[RequestStatus],
    ) -> Result<i64> {
        if statuses.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM requests WHERE worker_id = ");
        query.push_bind(worker_id).push(" AND status IN (");
        let mut separated = query.separated(", ");
        for status in statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");

        let (count,) = query
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn increment_worker_counter(&self, worker_id: WorkerId, delta: i64) -> Result<()> {
        let rows_affected = sqlx::query(
            "UPDATE workers SET lifetime_requests = lifetime_requests + ? WHERE id = ?",
        )
        .bind(delta)
        .bind(worker_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(LetterhouseError::WorkerNotFound(worker_id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(worker_id = %id))]
    async fn worker_report(&self, id: WorkerId) -> Result<WorkerReport> {
        let worker = self.get_worker(id).await?;

        let (total_requests, distinct_clients): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT client_id) FROM requests WHERE worker_id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(WorkerReport {
            worker_id: worker.id,
            name: worker.name,
            total_requests,
            distinct_clients,
        })
    }

    #[tracing::instrument(skip(self, filter), fields(name = ?filter.name, city = ?filter.city))]
    async fn list_clients(&self, filter: ClientFilter) -> Result<Vec<Client>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE 1 = 1"));
        if let Some(name) = filter.name_needle() {
            query
                .push(" AND LOWER(name) LIKE ")
                .push_bind(format!("%{name}%"));
        }
        if let Some(city) = filter.city_needle() {
            query
                .push(" AND LOWER(city) LIKE ")
                .push_bind(format!("%{city}%"));
        }
        query.push(" ORDER BY id ASC");

        let clients = query
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    async fn get_client(&self, id: ClientId) -> Result<Client> {
        sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LetterhouseError::ClientNotFound(id))
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    async fn create_client(&self, input: ClientInput) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients (name, city, reason, contact) VALUES (?, ?, ?, ?) \
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.reason)
        .bind(&input.contact)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(client_id = %client.id, "Created client");
        Ok(client)
    }

    #[tracing::instrument(skip(self, input), fields(client_id = %id))]
    async fn update_client(&self, id: ClientId, input: ClientInput) -> Result<Client> {
        sqlx::query_as::<_, Client>(&format!(
            "UPDATE clients SET name = ?, city = ?, reason = ?, contact = ? WHERE id = ? \
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.reason)
        .bind(&input.contact)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LetterhouseError::ClientNotFound(id))
    }

    #[tracing::instrument(skip(self), fields(client_id = %id))]
    async fn delete_client(&self, id: ClientId) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(LetterhouseError::ClientNotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, filter), fields(client_id = ?filter.client_id, status = ?filter.status))]
    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<Request>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE 1 = 1"));
        if let Some(client_id) = filter.client_id {
            query.push(" AND client_id = ").push_bind(client_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(" ORDER BY id ASC");

        let requests = query
            .build_query_as::<Request>()
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    async fn get_request(&self, id: RequestId) -> Result<Request> {
        sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LetterhouseError::RequestNotFound(id))
    }

    async fn insert_request(&self, request: NewRequest) -> Result<Request> {
        let request = sqlx::query_as::<_, Request>(&format!(
            "INSERT INTO requests (client_id, worker_id, date, status, content, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(request.client_id)
        .bind(request.worker_id)
        .bind(&request.date)
        .bind(RequestStatus::Draft)
        .bind(&request.content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    async fn save_request(&self, request: &Request) -> Result<()> {
        let rows_affected = sqlx::query("UPDATE requests SET status = ?, content = ? WHERE id = ?")
            .bind(request.status)
            .bind(&request.content)
            .bind(request.id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(LetterhouseError::RequestNotFound(request.id));
        }
        Ok(())
    }

    async fn delete_request_record(&self, id: RequestId) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(LetterhouseError::RequestNotFound(id));
        }
        Ok(())
    }
}
