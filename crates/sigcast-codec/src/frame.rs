//! Frame layout, encode and decode.

use crate::error::{CodecError, CodecResult};
use sigcast_core::{Signal, StrategyAction, TickOffsets};

/// Frame sentinel; the first four bytes of every frame.
pub const MAGIC: u32 = 0xA330_BEEF;

/// Protocol version carried in every frame.
pub const VERSION: u16 = 1;

/// Total encoded frame size in bytes.
pub const FRAME_LEN: usize = 104;

/// Authoritative byte offsets and field widths.
///
/// Typed fields end at offset 100; bytes 100..104 are reserved padding
/// and always zero. Frames are compared against [`FRAME_LEN`], never
/// against the field sum.
pub mod layout {
    pub const MAGIC: usize = 0;
    pub const VERSION: usize = 4;
    pub const ACTION: usize = 6;
    pub const TIMESTAMP: usize = 8;
    pub const LONG_STOP_LOSS: usize = 16;
    pub const SHORT_STOP_LOSS: usize = 20;
    pub const PROFIT_TARGET: usize = 24;
    pub const QTY: usize = 28;
    pub const CONFIDENCE: usize = 32;
    pub const SYMBOL: usize = 36;
    pub const SYMBOL_LEN: usize = 16;
    pub const INSTRUMENT: usize = 52;
    pub const INSTRUMENT_LEN: usize = 32;
    pub const SOURCE: usize = 84;
    pub const SOURCE_LEN: usize = 16;
    pub const RESERVED: usize = 100;
    pub const RESERVED_LEN: usize = 4;
}

// The layout must tile the frame exactly.
const _: () = assert!(layout::SOURCE + layout::SOURCE_LEN == layout::RESERVED);
const _: () = assert!(layout::RESERVED + layout::RESERVED_LEN == FRAME_LEN);

/// Encode a signal into the caller's scratch buffer.
///
/// The buffer is fully overwritten, so it can be reused across calls.
/// Not safe to share one buffer across threads; each publisher owns its
/// own scratch.
pub fn encode_into(signal: &Signal, buf: &mut [u8; FRAME_LEN]) {
    buf.fill(0);

    buf[layout::MAGIC..layout::MAGIC + 4].copy_from_slice(&MAGIC.to_le_bytes());
    buf[layout::VERSION..layout::VERSION + 2].copy_from_slice(&VERSION.to_le_bytes());
    buf[layout::ACTION..layout::ACTION + 2].copy_from_slice(&signal.action.code().to_le_bytes());
    buf[layout::TIMESTAMP..layout::TIMESTAMP + 8]
        .copy_from_slice(&signal.timestamp_ns.to_le_bytes());
    buf[layout::LONG_STOP_LOSS..layout::LONG_STOP_LOSS + 4]
        .copy_from_slice(&signal.ticks.long_stop_loss.to_le_bytes());
    buf[layout::SHORT_STOP_LOSS..layout::SHORT_STOP_LOSS + 4]
        .copy_from_slice(&signal.ticks.short_stop_loss.to_le_bytes());
    buf[layout::PROFIT_TARGET..layout::PROFIT_TARGET + 4]
        .copy_from_slice(&signal.ticks.profit_target.to_le_bytes());
    buf[layout::QTY..layout::QTY + 4].copy_from_slice(&signal.qty.to_le_bytes());
    buf[layout::CONFIDENCE..layout::CONFIDENCE + 4]
        .copy_from_slice(&signal.confidence.to_le_bytes());

    put_ascii(buf, layout::SYMBOL, layout::SYMBOL_LEN, &signal.symbol);
    put_ascii(
        buf,
        layout::INSTRUMENT,
        layout::INSTRUMENT_LEN,
        &signal.instrument,
    );
    put_ascii(buf, layout::SOURCE, layout::SOURCE_LEN, &signal.source);
}

/// Encode a signal into a fresh frame buffer.
#[must_use]
pub fn encode(signal: &Signal) -> [u8; FRAME_LEN] {
    let mut buf = [0u8; FRAME_LEN];
    encode_into(signal, &mut buf);
    buf
}

/// Write a zero-padded ASCII text field.
///
/// Characters beyond the field width are silently dropped; code points
/// above ASCII 127 map to `'?'`.
fn put_ascii(buf: &mut [u8], offset: usize, width: usize, value: &str) {
    for (slot, ch) in buf[offset..offset + width].iter_mut().zip(value.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
}

/// A frame decoded back into its field values.
///
/// Text fields are returned with trailing NUL padding stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    pub version: u16,
    pub action: StrategyAction,
    pub timestamp_ns: i64,
    pub ticks: TickOffsets,
    pub qty: i32,
    pub confidence: f32,
    pub symbol: String,
    pub instrument: String,
    pub source: String,
}

/// Decode one frame; the pure inverse of [`encode`] for valid input.
///
/// Consumers of the wire format use this; the publishing side only ever
/// encodes.
pub fn decode(frame: &[u8]) -> CodecResult<DecodedFrame> {
    if frame.len() < FRAME_LEN {
        return Err(CodecError::TooShort(frame.len(), FRAME_LEN));
    }

    let magic = u32::from_le_bytes(read4(frame, layout::MAGIC));
    if magic != MAGIC {
        return Err(CodecError::BadMagic(magic));
    }

    let version = u16::from_le_bytes(read2(frame, layout::VERSION));
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let action = StrategyAction::from_code(u16::from_le_bytes(read2(frame, layout::ACTION)))?;

    Ok(DecodedFrame {
        version,
        action,
        timestamp_ns: i64::from_le_bytes(read8(frame, layout::TIMESTAMP)),
        ticks: TickOffsets {
            long_stop_loss: i32::from_le_bytes(read4(frame, layout::LONG_STOP_LOSS)),
            short_stop_loss: i32::from_le_bytes(read4(frame, layout::SHORT_STOP_LOSS)),
            profit_target: i32::from_le_bytes(read4(frame, layout::PROFIT_TARGET)),
        },
        qty: i32::from_le_bytes(read4(frame, layout::QTY)),
        confidence: f32::from_le_bytes(read4(frame, layout::CONFIDENCE)),
        symbol: get_ascii(frame, layout::SYMBOL, layout::SYMBOL_LEN),
        instrument: get_ascii(frame, layout::INSTRUMENT, layout::INSTRUMENT_LEN),
        source: get_ascii(frame, layout::SOURCE, layout::SOURCE_LEN),
    })
}

fn read2(buf: &[u8], offset: usize) -> [u8; 2] {
    buf[offset..offset + 2].try_into().unwrap_or([0; 2])
}

fn read4(buf: &[u8], offset: usize) -> [u8; 4] {
    buf[offset..offset + 4].try_into().unwrap_or([0; 4])
}

fn read8(buf: &[u8], offset: usize) -> [u8; 8] {
    buf[offset..offset + 8].try_into().unwrap_or([0; 8])
}

fn get_ascii(buf: &[u8], offset: usize, width: usize) -> String {
    let field = &buf[offset..offset + width];
    let end = field.iter().position(|&b| b == 0).unwrap_or(width);
    field[..end].iter().map(|&b| b as char).collect()
}
