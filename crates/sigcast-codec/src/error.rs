//! Error types for sigcast-codec.
//!
//! Encoding is infallible; only decoding can reject input.

use thiserror::Error;

/// Codec error types.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Frame too short: {0} bytes, need {1}")]
    TooShort(usize, usize),

    #[error("Bad magic: {0:#010x}")]
    BadMagic(u32),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u16),

    #[error(transparent)]
    Core(#[from] sigcast_core::CoreError),
}

/// Result type alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
