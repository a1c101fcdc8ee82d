//! Classification error types.
//!
//! Ambiguity is not an error: `classify` always returns its best guess and
//! callers inspect the confidence score instead of catching exceptions.
//! Errors here are reserved for genuinely invalid input, such as a pattern
//! regex that fails to compile.

/// Unified error type for the intent classification crate.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// A regex supplied for an intent pattern is invalid.
    #[error("invalid regex pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
