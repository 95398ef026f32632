//! Strategy actions and the per-action tick-field policy.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Signal kind broadcast by the strategy.
///
/// The discriminants are wire codes; consumers match on the raw `u16`
/// in the frame, so these values must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum StrategyAction {
    /// First-tier long entry (stop loss only).
    LongEntry1 = 1,
    /// Second-tier long entry (stop loss + profit target).
    LongEntry2 = 2,
    /// First-tier short entry (stop loss only).
    ShortEntry1 = 3,
    /// Second-tier short entry (stop loss + profit target).
    ShortEntry2 = 4,
    LongExit = 5,
    ShortExit = 6,
    /// Notification: long-side protective stop filled.
    LongStopLoss = 7,
    /// Notification: short-side protective stop filled.
    ShortStopLoss = 8,
    /// Notification: profit target filled.
    ProfitTarget = 9,
}

impl StrategyAction {
    /// Wire code for the frame's action field.
    #[must_use]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Parse a wire code back into an action.
    pub fn from_code(code: u16) -> Result<Self, CoreError> {
        match code {
            1 => Ok(Self::LongEntry1),
            2 => Ok(Self::LongEntry2),
            3 => Ok(Self::ShortEntry1),
            4 => Ok(Self::ShortEntry2),
            5 => Ok(Self::LongExit),
            6 => Ok(Self::ShortExit),
            7 => Ok(Self::LongStopLoss),
            8 => Ok(Self::ShortStopLoss),
            9 => Ok(Self::ProfitTarget),
            other => Err(CoreError::UnknownActionCode(other)),
        }
    }

    /// Whether this action opens a position.
    ///
    /// The safety gate's trade counter is incremented once per accepted
    /// entry decision, so callers use this to tell entries apart from
    /// exit/fill notifications.
    #[must_use]
    pub fn is_entry(self) -> bool {
        matches!(
            self,
            Self::LongEntry1 | Self::LongEntry2 | Self::ShortEntry1 | Self::ShortEntry2
        )
    }

    /// Whether this action closes or reports on a position.
    #[must_use]
    pub fn is_exit(self) -> bool {
        !self.is_entry()
    }
}

impl std::fmt::Display for StrategyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LongEntry1 => "LongEntry1",
            Self::LongEntry2 => "LongEntry2",
            Self::ShortEntry1 => "ShortEntry1",
            Self::ShortEntry2 => "ShortEntry2",
            Self::LongExit => "LongExit",
            Self::ShortExit => "ShortExit",
            Self::LongStopLoss => "LongStopLoss",
            Self::ShortStopLoss => "ShortStopLoss",
            Self::ProfitTarget => "ProfitTarget",
        };
        write!(f, "{name}")
    }
}

/// Resolved tick-offset fields for one signal.
///
/// Which fields are populated is a pure function of the action, so the
/// policy lives here instead of being re-derived at every publish site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOffsets {
    /// Stop loss for long positions, in ticks.
    pub long_stop_loss: i32,
    /// Stop loss for short positions, in ticks.
    pub short_stop_loss: i32,
    /// Profit target, in ticks.
    pub profit_target: i32,
}

impl TickOffsets {
    /// Apply the action policy to the configured stop/offset distances.
    ///
    /// Entries carry their protective stop; second-tier entries also
    /// carry a profit target at `stop_loss + profit_offset`. Exits and
    /// fill notifications zero all three fields.
    #[must_use]
    pub fn for_action(action: StrategyAction, stop_loss: i32, profit_offset: i32) -> Self {
        match action {
            StrategyAction::LongEntry1 => Self {
                long_stop_loss: stop_loss,
                ..Self::default()
            },
            StrategyAction::LongEntry2 => Self {
                long_stop_loss: stop_loss,
                profit_target: stop_loss + profit_offset,
                ..Self::default()
            },
            StrategyAction::ShortEntry1 => Self {
                short_stop_loss: stop_loss,
                ..Self::default()
            },
            StrategyAction::ShortEntry2 => Self {
                short_stop_loss: stop_loss,
                profit_target: stop_loss + profit_offset,
                ..Self::default()
            },
            StrategyAction::LongExit
            | StrategyAction::ShortExit
            | StrategyAction::LongStopLoss
            | StrategyAction::ShortStopLoss
            | StrategyAction::ProfitTarget => Self::default(),
        }
    }
}
