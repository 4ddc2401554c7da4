//! # Error Types
//!
//! Errors raised while constructing core values. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Error constructing a core value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A string could not be parsed as a date/time.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input, verbatim.
        input: String,
        /// Why parsing failed.
        reason: String,
    },
}
