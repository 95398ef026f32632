//! Trading-hours error types.
//!
//! Every variant here is recoverable: the resolver degrades to the
//! manual window instead of surfacing a hard failure to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoursError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Schedule fetch failed: {0}")]
    Fetch(String),

    #[error("Malformed schedule response: {0}")]
    Malformed(String),
}

pub type HoursResult<T> = std::result::Result<T, HoursError>;
