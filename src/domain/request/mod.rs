//! Request aggregate - domain model and status transitions.
//!
//! - Request types and the closed status enumeration
//! - Transition and deletion rules

pub mod state;
pub mod transitions;

// Re-export commonly used types
pub use state::*;
pub use transitions::{can_delete, ensure_deletable, validate_transition};
