//! Extractors whose rejections are reported as [`LetterhouseError`].
//!
//! axum's stock `Json`, `Query` and `Path` answer malformed input with
//! plain-text 400/422 responses. These wrappers route the same failures
//! through the crate error so every bad input gets a 400 `{"error": ...}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::LetterhouseError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(LetterhouseError))]
pub struct Json<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(LetterhouseError))]
pub struct Query<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(LetterhouseError))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for LetterhouseError {
    fn from(rejection: JsonRejection) -> Self {
        LetterhouseError::ValidationError(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for LetterhouseError {
    fn from(rejection: QueryRejection) -> Self {
        LetterhouseError::ValidationError(format!(
            "invalid query string: {}",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for LetterhouseError {
    fn from(rejection: PathRejection) -> Self {
        LetterhouseError::ValidationError(format!("invalid path: {}", rejection.body_text()))
    }
}
