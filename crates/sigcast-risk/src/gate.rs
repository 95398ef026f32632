//! Daily trade-count and loss limits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configured daily limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum entries allowed per trading day.
    #[serde(default = "default_max_trades_per_day")]
    pub max_trades_per_day: u32,
    /// Maximum daily loss (positive currency amount) before the gate
    /// denies for the rest of the day.
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: Decimal,
}

fn default_max_trades_per_day() -> u32 {
    1000
}

fn default_max_daily_loss() -> Decimal {
    Decimal::from(50_000)
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_trades_per_day: default_max_trades_per_day(),
            max_daily_loss: default_max_daily_loss(),
        }
    }
}

/// Why the gate denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    TradeCapReached,
    DailyLossReached,
}

/// Outcome of one gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(DenyReason),
}

impl GateDecision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Per-instance daily counters.
///
/// Day rollover is detected lazily on the next check, not by a timer:
/// the first check on a new calendar day resets both counters before
/// evaluating the limits.
#[derive(Debug)]
pub struct SafetyGate {
    limits: SafetyLimits,
    current_day: Option<NaiveDate>,
    trades_today: u32,
    daily_pnl: Decimal,
}

impl SafetyGate {
    #[must_use]
    pub fn new(limits: SafetyLimits) -> Self {
        Self {
            limits,
            current_day: None,
            trades_today: 0,
            daily_pnl: Decimal::ZERO,
        }
    }

    /// Check the limits for a bar on `today`, rolling the day first if
    /// the calendar moved on.
    pub fn check(&mut self, today: NaiveDate) -> GateDecision {
        if self.current_day != Some(today) {
            if self.current_day.is_some() {
                info!(day = %today, "New trading day, counters reset");
            }
            self.current_day = Some(today);
            self.trades_today = 0;
            self.daily_pnl = Decimal::ZERO;
        }

        if self.trades_today >= self.limits.max_trades_per_day {
            warn!(
                trades = self.trades_today,
                max = self.limits.max_trades_per_day,
                "Max trades per day reached, no more trades today"
            );
            return GateDecision::Deny(DenyReason::TradeCapReached);
        }

        if self.daily_pnl < Decimal::ZERO && self.daily_pnl.abs() >= self.limits.max_daily_loss {
            warn!(
                pnl = %self.daily_pnl,
                max_loss = %self.limits.max_daily_loss,
                "Daily loss limit reached, no more trades today"
            );
            return GateDecision::Deny(DenyReason::DailyLossReached);
        }

        GateDecision::Allow
    }

    /// Count one accepted entry decision (not one order leg).
    pub fn record_entry(&mut self) {
        self.trades_today += 1;
        info!(
            trades = self.trades_today,
            max = self.limits.max_trades_per_day,
            "Trade count incremented"
        );
    }

    /// Replace the running P&L with the latest position valuation.
    /// Called from every execution-fill notification.
    pub fn update_pnl(&mut self, unrealized: Decimal) {
        self.daily_pnl = unrealized;
    }

    #[must_use]
    pub fn trades_today(&self) -> u32 {
        self.trades_today
    }

    #[must_use]
    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dom).unwrap()
    }

    fn gate(max_trades: u32, max_loss: Decimal) -> SafetyGate {
        SafetyGate::new(SafetyLimits {
            max_trades_per_day: max_trades,
            max_daily_loss: max_loss,
        })
    }

    #[test]
    fn test_allows_under_limits() {
        let mut gate = gate(2, dec!(500));
        assert!(gate.check(day(2026, 3, 2)).is_allowed());
        gate.record_entry();
        assert!(gate.check(day(2026, 3, 2)).is_allowed());
    }

    #[test]
    fn test_trade_cap_denies() {
        let mut gate = gate(2, dec!(500));
        gate.record_entry();
        gate.record_entry();
        assert_eq!(
            gate.check(day(2026, 3, 2)),
            GateDecision::Deny(DenyReason::TradeCapReached)
        );
    }

    #[test]
    fn test_day_rollover_resets_counters() {
        let mut gate = gate(2, dec!(500));
        let _ = gate.check(day(2026, 3, 2));
        gate.record_entry();
        gate.record_entry();
        gate.update_pnl(dec!(-600));
        assert!(!gate.check(day(2026, 3, 2)).is_allowed());

        // First check on the next day resets and allows.
        assert!(gate.check(day(2026, 3, 3)).is_allowed());
        assert_eq!(gate.trades_today(), 0);
        assert_eq!(gate.daily_pnl(), Decimal::ZERO);
    }

    #[test]
    fn test_loss_limit_denies_only_on_losses() {
        let mut gate = gate(100, dec!(500));
        let _ = gate.check(day(2026, 3, 2));

        // A large gain never trips the loss limit.
        gate.update_pnl(dec!(600));
        assert!(gate.check(day(2026, 3, 2)).is_allowed());

        gate.update_pnl(dec!(-499));
        assert!(gate.check(day(2026, 3, 2)).is_allowed());

        gate.update_pnl(dec!(-500));
        assert_eq!(
            gate.check(day(2026, 3, 2)),
            GateDecision::Deny(DenyReason::DailyLossReached)
        );
    }

    #[test]
    fn test_pnl_is_replaced_not_accumulated() {
        let mut gate = gate(100, dec!(500));
        let _ = gate.check(day(2026, 3, 2));
        gate.update_pnl(dec!(-300));
        gate.update_pnl(dec!(-100));
        assert_eq!(gate.daily_pnl(), dec!(-100));
        assert!(gate.check(day(2026, 3, 2)).is_allowed());
    }
}
