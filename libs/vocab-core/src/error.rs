//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur during a sync run.
///
/// A failed note parse is not represented here; it is an expected outcome
/// and surfaces as `None` from [`crate::parser::parse_note`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Connectivity(String),

    #[error("Gateway error: {status} - {message}")]
    Gateway { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("State store error: {0}")]
    Persistence(String),
}
