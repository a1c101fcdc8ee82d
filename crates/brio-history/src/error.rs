//! History error types.
//!
//! Unknown request ids are warn-logged no-ops, never errors; errors here are
//! limited to saved-view (de)serialization at the storage boundary.

/// Unified error type for the history crate.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Saved views failed to serialize or deserialize.
    #[error("saved view serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the history crate.
pub type Result<T> = std::result::Result<T, HistoryError>;
