//! Request types and the status enumeration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientId;
use crate::domain::worker::WorkerId;
use crate::error::{LetterhouseError, Result, require_non_empty};

/// Lifecycle status of a letter request.
///
/// This is the value stored in the `status` column. Requests only ever move
/// forward along `Draft -> Reviewed -> Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Draft,
    Reviewed,
    Sent,
}

impl RequestStatus {
    /// Statuses that count against a worker's capacity.
    pub const IN_FLIGHT: [RequestStatus; 2] = [RequestStatus::Draft, RequestStatus::Reviewed];

    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Draft,
        RequestStatus::Reviewed,
        RequestStatus::Sent,
    ];

    /// The transition table: the only status this one may move to.
    pub fn next(self) -> Option<RequestStatus> {
        match self {
            RequestStatus::Draft => Some(RequestStatus::Reviewed),
            RequestStatus::Reviewed => Some(RequestStatus::Sent),
            RequestStatus::Sent => None,
        }
    }

    pub fn can_transition_to(self, requested: RequestStatus) -> bool {
        self.next() == Some(requested)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Reviewed => "reviewed",
            RequestStatus::Sent => "sent",
        }
    }

    /// Parses the lowercase wire form. Anything else yields `None`.
    pub fn parse(value: &str) -> Option<RequestStatus> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RequestId(pub i64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId(id)
    }
}

impl std::ops::Deref for RequestId {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A letter request as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Request {
    pub id: RequestId,
    pub client_id: ClientId,
    /// Set once at creation; never reassigned.
    pub worker_id: WorkerId,
    /// Caller-supplied date, kept verbatim.
    pub date: String,
    pub status: RequestStatus,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A request ready to be inserted, after a worker has been picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub client_id: ClientId,
    pub worker_id: WorkerId,
    pub date: String,
    pub content: String,
}

/// Caller input for creating a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub content: String,
}

impl CreateRequest {
    pub fn validate(&self) -> Result<ClientId> {
        let client_id = match self.client_id {
            Some(id) if *id > 0 => id,
            _ => {
                return Err(LetterhouseError::ValidationError(
                    "'client_id' is required".to_string(),
                ));
            }
        };
        require_non_empty("date", &self.date)?;
        require_non_empty("content", &self.content)?;
        Ok(client_id)
    }
}

/// Caller input for moving a request along its lifecycle.
///
/// `status` stays a raw string here so that unknown values are reported as an
/// invalid transition rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub status: String,
    pub content: String,
}

/// Listing filter for requests; both fields are exact matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<RequestStatus>,
}

/// Raw `?client=&status=` listing parameters, as typed by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestQuery {
    pub client: Option<String>,
    pub status: Option<String>,
}

impl RequestQuery {
    /// Resolve the raw parameters into a typed filter.
    ///
    /// An empty or non-numeric `client` is ignored, as is an empty `status`.
    /// Returns `None` when `status` names no known status, since no request
    /// can match it.
    pub fn into_filter(self) -> Option<RequestFilter> {
        let client_id = self
            .client
            .as_deref()
            .and_then(|c| c.parse::<i64>().ok())
            .map(ClientId);
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(RequestStatus::parse(raw)?),
        };
        Some(RequestFilter { client_id, status })
    }
}

impl RequestFilter {
    pub fn matches(&self, request: &Request) -> bool {
        self.client_id.is_none_or(|c| c == request.client_id)
            && self.status.is_none_or(|s| s == request.status)
    }
}
