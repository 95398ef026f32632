//! Fixed 104-byte binary frame codec for trading signals.
//!
//! One signal is serialized into exactly [`FRAME_LEN`] bytes; the fixed
//! length is the framing, there is no envelope or length prefix. All
//! numeric fields are little-endian. See [`layout`] for the authoritative
//! offsets.

pub mod error;
pub mod frame;

pub use error::{CodecError, CodecResult};
pub use frame::{decode, encode, encode_into, layout, DecodedFrame, FRAME_LEN, MAGIC, VERSION};
