//! Error types for matgen

use thiserror::Error;

/// Run-level errors. Per-item problems are reported, not raised.
#[derive(Debug, Error)]
pub enum MatgenError {
    /// Input/output location or template is unusable; the run never starts
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for matgen operations
pub type Result<T> = std::result::Result<T, MatgenError>;

impl MatgenError {
    /// True for errors that abort a run before any item is processed
    pub fn is_precondition(&self) -> bool {
        matches!(self, MatgenError::PreconditionFailed(_))
    }
}
