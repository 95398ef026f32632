//! The fully resolved signal handed to the frame codec.

use crate::action::{StrategyAction, TickOffsets};
use chrono::{DateTime, Utc};

/// One trading signal, ready for encoding.
///
/// A `Signal` has no lifecycle of its own: it is built, encoded into a
/// frame and discarded within a single publish call.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Master instrument symbol (e.g. "ES", "NQ").
    pub symbol: String,
    /// Full instrument name including the contract month.
    pub instrument: String,
    pub action: StrategyAction,
    /// Stop/target tick offsets, already resolved via the action policy.
    pub ticks: TickOffsets,
    /// Position quantity.
    pub qty: i32,
    /// Signal confidence metric, 0-100.
    pub confidence: f32,
    /// Source strategy tag identifying the emitter.
    pub source: String,
    /// Signal time, nanoseconds since the Unix epoch, UTC.
    pub timestamp_ns: i64,
}

impl Signal {
    /// Build a signal stamped with the given wall-clock time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        instrument: impl Into<String>,
        action: StrategyAction,
        ticks: TickOffsets,
        qty: i32,
        confidence: f32,
        source: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            instrument: instrument.into(),
            action,
            ticks,
            qty,
            confidence,
            source: source.into(),
            timestamp_ns: at.timestamp_nanos_opt().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_signal_timestamp_is_nanos() {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap();
        let signal = Signal::new(
            "ES",
            "ES 06-26",
            StrategyAction::LongEntry1,
            TickOffsets::for_action(StrategyAction::LongEntry1, 35, 30),
            1,
            50.0,
            "AtomSetupV2",
            at,
        );
        assert_eq!(signal.timestamp_ns, at.timestamp_nanos_opt().unwrap());
        assert_eq!(signal.ticks.long_stop_loss, 35);
    }
}
