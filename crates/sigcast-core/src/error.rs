//! Error types for sigcast-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown action code: {0}")]
    UnknownActionCode(u16),

    #[error("Invalid signal field: {0}")]
    InvalidSignal(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
