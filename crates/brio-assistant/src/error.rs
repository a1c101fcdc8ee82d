//! Assistant facade error types.

/// Unified error type for the assistant facade.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// An error propagated from the runtime crate.
    #[error("runtime error: {0}")]
    Runtime(#[from] brio_runtime::RuntimeError),

    /// An error propagated from the history crate.
    #[error("history error: {0}")]
    History(#[from] brio_history::HistoryError),
}

/// Convenience alias used throughout the assistant crate.
pub type Result<T> = std::result::Result<T, AssistantError>;
