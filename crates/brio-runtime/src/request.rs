//! Request lifecycle state machine.
//!
//! A [`Request`] tracks one user-submitted unit of work from creation to a
//! terminal state:
//!
//! ```text
//! draft ──> awaiting_confirm ──> running ──> done
//!   │              │               │
//!   │              └──> skipped    └──> error
//!   ├──> running
//!   └──> skipped
//! ```
//!
//! `done`, `error`, and `skipped` are terminal.  A transition mutates only
//! the status, `updated_at`, and the terminal payload being attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, RuntimeError};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Created, not yet gated into execution.
    Draft,
    /// Waiting for explicit user confirmation.
    AwaitingConfirm,
    /// Handed to the capability collaborator.
    Running,
    /// Completed successfully (terminal).
    Done,
    /// The capability reported failure (terminal).
    Error,
    /// Cancelled before execution (terminal).
    Skipped,
}

impl RequestStatus {
    /// Whether this status accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::Skipped)
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(self, next: Self) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Draft, AwaitingConfirm | Running | Skipped)
                | (AwaitingConfirm, Running | Skipped)
                | (Running, Done | Error)
        )
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Who authored the request content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestRole {
    User,
    Assistant,
}

/// A user-facing follow-up action attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpAction {
    /// Button label shown in the UI.
    pub label: String,
    /// Command the UI replays when the action is chosen.
    pub command: Option<String>,
}

/// One tracked unit of work.
///
/// Requests are created on submission, mutated in place by id as execution
/// proceeds, and never deleted — only hidden by filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Stable unique identifier.
    pub id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent transition.
    pub updated_at: DateTime<Utc>,
    /// Who authored the content.
    pub role: RequestRole,
    /// The raw submitted text.
    pub content: String,
    /// The capability routed to, when one is registered for the intent.
    pub skill: Option<String>,
    /// Project association extracted from the message.
    pub project: Option<String>,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Plan produced by a planning capability, if any.
    pub plan_id: Option<Uuid>,
    /// Result summary attached on completion.
    pub result: Option<serde_json::Value>,
    /// Artifact references attached on completion.
    pub artifacts: Vec<String>,
    /// Follow-up actions offered to the user.
    pub actions: Vec<FollowUpAction>,
    /// Error payload attached on failure.
    pub error: Option<String>,
}

impl Request {
    /// Create a draft request.
    pub fn new(role: RequestRole, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            role,
            content: content.into(),
            skill: None,
            project: None,
            status: RequestStatus::Draft,
            plan_id: None,
            result: None,
            artifacts: Vec::new(),
            actions: Vec::new(),
            error: None,
        }
    }

    /// Set the routed capability name.
    #[must_use]
    pub fn with_skill(mut self, skill: Option<String>) -> Self {
        self.skill = skill;
        self
    }

    /// Set the project association.
    #[must_use]
    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    /// Advance the lifecycle to `next`.
    ///
    /// Only edges of the state machine are permitted; terminal states accept
    /// nothing.  On success, `updated_at` is refreshed.
    pub fn transition(&mut self, next: RequestStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(RuntimeError::InvalidTransition {
                request_id: self.id,
                from: self.status,
                to: next,
            });
        }

        info!(request_id = %self.id, from = ?self.status, to = ?next, "request transition");
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply a capability completion signal: `running -> done`, attaching
    /// the result summary and artifacts.
    pub fn complete(
        &mut self,
        result: Option<serde_json::Value>,
        artifacts: Vec<String>,
    ) -> Result<()> {
        self.transition(RequestStatus::Done)?;
        self.result = result;
        self.artifacts = artifacts;
        Ok(())
    }

    /// Apply a capability failure signal: `running -> error`, attaching the
    /// error payload.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<()> {
        self.transition(RequestStatus::Error)?;
        self.error = Some(error.into());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
