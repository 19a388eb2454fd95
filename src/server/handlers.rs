//! Route handlers.
//!
//! Handlers stay thin: field validation for plain CRUD happens here, after
//! the existence check on updates, and the request workflow is delegated to
//! the default methods on [`Storage`].

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use super::extract;

use crate::domain::client::{Client, ClientFilter, ClientId, ClientInput};
use crate::domain::request::{CreateRequest, Request, RequestId, RequestQuery, UpdateRequest};
use crate::domain::worker::{Worker, WorkerId, WorkerInput, WorkerReport};
use crate::error::Result;
use crate::manager::Storage;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Workers

pub async fn list_workers<S: Storage>(State(storage): State<Arc<S>>) -> Result<Json<Vec<Worker>>> {
    Ok(Json(storage.list_workers().await?))
}

pub async fn create_worker<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Json(input): extract::Json<WorkerInput>,
) -> Result<Json<Worker>> {
    input.validate()?;
    Ok(Json(storage.create_worker(input).await?))
}

pub async fn update_worker<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<WorkerId>,
    extract::Json(input): extract::Json<WorkerInput>,
) -> Result<Json<Worker>> {
    storage.get_worker(id).await?;
    input.validate()?;
    Ok(Json(storage.update_worker(id, input).await?))
}

pub async fn delete_worker<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<WorkerId>,
) -> Result<Json<Value>> {
    storage.delete_worker(id).await?;
    Ok(Json(json!({ "message": format!("Worker {id} deleted") })))
}

pub async fn worker_report<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<WorkerId>,
) -> Result<Json<WorkerReport>> {
    Ok(Json(storage.worker_report(id).await?))
}

// Clients

pub async fn list_clients<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Query(filter): extract::Query<ClientFilter>,
) -> Result<Json<Vec<Client>>> {
    Ok(Json(storage.list_clients(filter).await?))
}

pub async fn create_client<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Json(input): extract::Json<ClientInput>,
) -> Result<Json<Client>> {
    input.validate()?;
    Ok(Json(storage.create_client(input).await?))
}

pub async fn update_client<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<ClientId>,
    extract::Json(input): extract::Json<ClientInput>,
) -> Result<Json<Client>> {
    storage.get_client(id).await?;
    input.validate()?;
    Ok(Json(storage.update_client(id, input).await?))
}

pub async fn delete_client<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<ClientId>,
) -> Result<Json<Value>> {
    storage.delete_client(id).await?;
    Ok(Json(json!({ "message": format!("Client {id} deleted") })))
}

// Requests

pub async fn list_requests<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Query(query): extract::Query<RequestQuery>,
) -> Result<Json<Vec<Request>>> {
    // An unknown status filter cannot match anything
    let Some(filter) = query.into_filter() else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(storage.list_requests(filter).await?))
}

pub async fn create_request<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Json(input): extract::Json<CreateRequest>,
) -> Result<Json<Request>> {
    Ok(Json(storage.create_request(input).await?))
}

pub async fn update_request<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<RequestId>,
    extract::Json(update): extract::Json<UpdateRequest>,
) -> Result<Json<Request>> {
    Ok(Json(storage.update_request_status(id, update).await?))
}

pub async fn delete_request<S: Storage>(
    State(storage): State<Arc<S>>,
    extract::Path(id): extract::Path<RequestId>,
) -> Result<Json<Value>> {
    storage.delete_request(id).await?;
    Ok(Json(json!({ "message": format!("Request {id} deleted") })))
}
