//! Risk error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    /// Another instance already publishes for this key. The denied
    /// instance must stay inert for its whole lifetime; this is never
    /// retried.
    #[error("Another instance is already active for {0}")]
    ExclusivityDenied(String),

    #[error("Invalid safety limit: {0}")]
    InvalidLimit(String),
}

pub type RiskResult<T> = std::result::Result<T, RiskError>;
