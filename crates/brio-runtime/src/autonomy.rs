//! Autonomy policy gate.
//!
//! The gate is a pure function from (mode, capability danger flag) to an
//! execution decision.  It governs only the transition out of
//! draft/awaiting-confirm; it never alters a classification.

use serde::{Deserialize, Serialize};

/// Process-wide autonomy setting, mutable by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyMode {
    /// Classification is informational only; nothing executes.
    Ask,
    /// Every execution needs an explicit user confirmation.
    AskToAct,
    /// Non-dangerous capabilities execute automatically.
    Act,
}

/// The gate's verdict for one capability invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionDecision {
    /// The capability may run immediately.
    pub auto_execute: bool,
    /// The capability may run only after explicit user confirmation.
    pub requires_confirmation: bool,
    /// The capability may not run at all under the current mode.
    pub blocked: bool,
}

/// Decide whether a classified capability may run.
///
/// `dangerous` is declared by the capability's owning collaborator, not
/// inferred from the classifier, and forces confirmation even in
/// [`AutonomyMode::Act`].
pub fn decide(mode: AutonomyMode, dangerous: bool) -> ExecutionDecision {
    match mode {
        AutonomyMode::Ask => ExecutionDecision {
            auto_execute: false,
            requires_confirmation: false,
            blocked: true,
        },
        AutonomyMode::AskToAct => ExecutionDecision {
            auto_execute: false,
            requires_confirmation: true,
            blocked: false,
        },
        AutonomyMode::Act => ExecutionDecision {
            auto_execute: !dangerous,
            requires_confirmation: dangerous,
            blocked: false,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
