//! Autonomy policy, request lifecycle, and capability contract for the Brio
//! assistant.
//!
//! This crate provides:
//!
//! - **Autonomy gate**: the pure mode/danger decision function via
//!   [`autonomy::decide`].
//! - **Lifecycle**: the request state machine via [`request::Request`] and
//!   [`request::RequestStatus`].
//! - **Capabilities**: the async collaborator contract and concurrent
//!   registry via [`capability::Capability`] and
//!   [`capability::CapabilityRegistry`].
//! - **UI events**: the abstract open/close/focus broadcast bus via
//!   [`events::UiEventBus`].

pub mod autonomy;
pub mod capability;
pub mod error;
pub mod events;
pub mod request;

pub use autonomy::{AutonomyMode, ExecutionDecision, decide};
pub use capability::{Capability, CapabilityOutcome, CapabilityRegistry, RequestContext};
pub use error::{Result, RuntimeError};
pub use events::{UiEvent, UiEventBus};
pub use request::{FollowUpAction, Request, RequestRole, RequestStatus};
