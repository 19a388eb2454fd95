//! Status transitions for letter requests.
//!
//! A request is created in `Draft` and can only move one step forward at a
//! time:
//!
//! ```text
//! Draft ──review──> Reviewed ──send──> Sent
//!   │
//!   └──delete (only while Draft)
//! ```
//!
//! Same-state, backward and skipping transitions are rejected, as is any
//! status string outside `draft`/`reviewed`/`sent`. Content is replaced in the
//! same edit as the status and must not be empty.

use crate::error::{LetterhouseError, Result, require_non_empty};

use super::state::{Request, RequestStatus, UpdateRequest};

/// Checks that `request` may move to the status named by `requested`.
///
/// Returns the parsed target status on success.
pub fn validate_transition(request: &Request, requested: &str) -> Result<RequestStatus> {
    let invalid = || LetterhouseError::InvalidTransition {
        id: request.id,
        from: request.status,
        to: requested.to_string(),
    };

    let target = RequestStatus::parse(requested).ok_or_else(invalid)?;
    if !request.status.can_transition_to(target) {
        return Err(invalid());
    }
    Ok(target)
}

/// Deletion guard: only drafts may be removed.
pub fn can_delete(status: RequestStatus) -> bool {
    status == RequestStatus::Draft
}

pub fn ensure_deletable(request: &Request) -> Result<()> {
    if can_delete(request.status) {
        Ok(())
    } else {
        Err(LetterhouseError::DeleteNotAllowed {
            id: request.id,
            status: request.status,
        })
    }
}

impl Request {
    /// Applies an edit, moving the request one step along its lifecycle.
    ///
    /// The status string is checked before the content so that a malformed
    /// status is always reported as an invalid transition.
    pub fn advance(mut self, update: UpdateRequest) -> Result<Request> {
        let target = validate_transition(&self, &update.status)?;
        require_non_empty("content", &update.content)?;

        tracing::debug!(
            request_id = %self.id,
            from = %self.status,
            to = %target,
            "Advancing request"
        );

        self.status = target;
        self.content = update.content;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientId;
    use crate::domain::request::RequestId;
    use crate::domain::worker::WorkerId;

    fn request(status: RequestStatus) -> Request {
        Request {
            id: RequestId(7),
            client_id: ClientId(1),
            worker_id: WorkerId(1),
            date: "2026-10-18".to_string(),
            status,
            content: "Dear Luculia,".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn update(status: &str, content: &str) -> UpdateRequest {
        UpdateRequest {
            status: status.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_only_forward_single_steps_are_valid() {
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                let result = validate_transition(&request(from), to.as_str());
                let expected = matches!(
                    (from, to),
                    (RequestStatus::Draft, RequestStatus::Reviewed)
                        | (RequestStatus::Reviewed, RequestStatus::Sent)
                );
                assert_eq!(
                    result.is_ok(),
                    expected,
                    "transition {from} -> {to} should be {}",
                    if expected { "valid" } else { "invalid" }
                );
            }
        }
    }

    #[test]
    fn test_draft_cannot_skip_to_sent() {
        let err = validate_transition(&request(RequestStatus::Draft), "sent").unwrap_err();
        match err {
            LetterhouseError::InvalidTransition { id, from, to } => {
                assert_eq!(id, RequestId(7));
                assert_eq!(from, RequestStatus::Draft);
                assert_eq!(to, "sent");
            }
            other => panic!("Expected InvalidTransition, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_status_rejected_from_any_state() {
        for from in RequestStatus::ALL {
            let err = validate_transition(&request(from), "archived").unwrap_err();
            assert!(matches!(err, LetterhouseError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_delete_guard() {
        assert!(can_delete(RequestStatus::Draft));
        assert!(!can_delete(RequestStatus::Reviewed));
        assert!(!can_delete(RequestStatus::Sent));

        let err = ensure_deletable(&request(RequestStatus::Sent)).unwrap_err();
        assert!(matches!(
            err,
            LetterhouseError::DeleteNotAllowed {
                status: RequestStatus::Sent,
                ..
            }
        ));
    }

    #[test]
    fn test_advance_replaces_content_and_status() {
        let advanced = request(RequestStatus::Draft)
            .advance(update("reviewed", "Dear Luculia, revised"))
            .unwrap();
        assert_eq!(advanced.status, RequestStatus::Reviewed);
        assert_eq!(advanced.content, "Dear Luculia, revised");
        assert_eq!(advanced.worker_id, WorkerId(1));
    }

    #[test]
    fn test_advance_requires_content() {
        let err = request(RequestStatus::Draft)
            .advance(update("reviewed", "  "))
            .unwrap_err();
        assert!(matches!(err, LetterhouseError::ValidationError(_)));
    }
}
