//! Transport error types.
//!
//! Only channel establishment is fallible. Per-send failures are
//! best-effort outcomes, counted by the publisher and never raised.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to open channel {name}: {source}")]
    Connect {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid endpoint address: {0}")]
    InvalidAddress(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;
