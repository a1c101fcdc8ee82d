//! Presentation facade for the Brio assistant core.
//!
//! This crate assembles the classification, autonomy, lifecycle, and
//! history layers behind a single [`Assistant`] surface:
//!
//! - `classify` / `submit` / `confirm` / `cancel` and the capability
//!   completion signal ([`Assistant::apply_outcome`]).
//! - `apply_filter` / `clear_filter` / `search` over the request history.
//! - `save_view` / `load_view` / `delete_view` for named filter snapshots.
//! - The abstract open/close/focus-search UI event stream.

pub mod assistant;
pub mod error;

pub use assistant::Assistant;
pub use error::{AssistantError, Result};

// Commonly used types from the layered crates, re-exported so embedding
// hosts depend on one crate.
pub use brio_history::{Filter, History, KeyValue, MemoryKeyValue, SavedView};
pub use brio_intent::{
    ClassificationResult, Classifier, EntityKind, EntityValue, IntentPattern,
};
pub use brio_runtime::{
    AutonomyMode, Capability, CapabilityOutcome, CapabilityRegistry, Request, RequestContext,
    RequestStatus, UiEvent,
};
