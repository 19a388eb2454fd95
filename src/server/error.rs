//! Mapping of desk errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::LetterhouseError;

impl LetterhouseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LetterhouseError::WorkerNotFound(_)
            | LetterhouseError::ClientNotFound(_)
            | LetterhouseError::RequestNotFound(_) => StatusCode::NOT_FOUND,
            LetterhouseError::ValidationError(_)
            | LetterhouseError::NotAvailable { .. }
            | LetterhouseError::InvalidTransition { .. }
            | LetterhouseError::DeleteNotAllowed { .. } => StatusCode::BAD_REQUEST,
            LetterhouseError::Database(_) | LetterhouseError::Migration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            LetterhouseError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LetterhouseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "Request failed with internal error");
            "Internal server error".to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
