//! Pipeline error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] sigcast_transport::TransportError),

    #[error("Trading-hours error: {0}")]
    Hours(#[from] sigcast_hours::HoursError),

    #[error("Risk error: {0}")]
    Risk(#[from] sigcast_risk::RiskError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
