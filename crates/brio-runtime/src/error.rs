//! Runtime error types.
//!
//! Unknown request ids and policy refusals are normal outcomes handled as
//! no-ops or decision flags, never errors.  Errors here mean a caller asked
//! for a transition the lifecycle state machine forbids.

use uuid::Uuid;

use crate::request::RequestStatus;

/// Unified error type for the runtime crate.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The requested status transition is not an edge of the lifecycle
    /// state machine.
    #[error("invalid transition for request {request_id}: {from:?} -> {to:?}")]
    InvalidTransition {
        request_id: Uuid,
        from: RequestStatus,
        to: RequestStatus,
    },
}

/// Convenience alias used throughout the runtime crate.
pub type Result<T> = std::result::Result<T, RuntimeError>;
