//! The per-instance publication pipeline.

use crate::config::{FlattenConfig, PipelineConfig};
use crate::error::PipelineResult;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use sigcast_core::{Signal, StrategyAction, TickOffsets};
use sigcast_hours::{
    window_contains, HoursMode, HttpScheduleClient, ManualWindow, ScheduleCache, WindowResolver,
};
use sigcast_risk::{InstanceGrant, InstanceKey, InstanceRegistry, RiskError, SafetyGate};
use sigcast_transport::Publisher;
use std::sync::Arc;
use tracing::{debug, info};

/// The traded instrument as the host platform describes it.
#[derive(Debug, Clone)]
pub struct InstrumentRef {
    /// Account identifier, half of the exclusivity key.
    pub account: String,
    /// Master symbol stamped into frames (e.g. "ES").
    pub symbol: String,
    /// Full instrument name including contract month; the other half
    /// of the exclusivity key.
    pub full_name: String,
}

impl InstrumentRef {
    pub fn new(
        account: impl Into<String>,
        symbol: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            symbol: symbol.into(),
            full_name: full_name.into(),
        }
    }
}

/// One strategy instance's view of the publication pipeline.
///
/// Driven synchronously from the host's bar/execution callbacks:
///
/// ```text
/// bar tick -> permits_trading -> caller decides -> publish
/// fill     -> update_daily_pnl
/// ```
pub struct SignalPipeline {
    instrument: InstrumentRef,
    source_tag: String,
    qty: i32,
    stop_loss_ticks: i32,
    profit_offset_ticks: i32,
    emit_historical: bool,
    flatten: FlattenConfig,
    manual_window: ManualWindow,
    publisher: Publisher,
    resolver: Option<WindowResolver>,
    gate: Option<SafetyGate>,
    grant: Option<InstanceGrant>,
    realtime: bool,
}

impl SignalPipeline {
    /// Claim exclusivity, build the resolver and gate, and open all
    /// configured channels.
    ///
    /// Fails with [`RiskError::ExclusivityDenied`] when another
    /// instance already publishes for this (account, instrument); the
    /// host must then leave this instance inert.
    pub fn start(
        config: &PipelineConfig,
        instrument: InstrumentRef,
        registry: &InstanceRegistry,
        cache: Arc<ScheduleCache>,
    ) -> PipelineResult<Self> {
        let key = InstanceKey::new(&instrument.account, &instrument.full_name);
        let grant = registry
            .acquire(key.clone())
            .ok_or_else(|| RiskError::ExclusivityDenied(key.to_string()))?;

        let manual_window = config.hours.manual_window()?;
        let resolver = if config.hours.enabled {
            Some(match config.hours.mode {
                HoursMode::Manual => WindowResolver::manual(manual_window),
                HoursMode::Remote => {
                    let client = HttpScheduleClient::new(config.hours.base_url.clone())?;
                    WindowResolver::remote(
                        manual_window,
                        config.hours.is_micro,
                        Box::new(client),
                        cache,
                    )
                }
            })
        } else {
            None
        };

        let gate = config
            .safety
            .enabled
            .then(|| SafetyGate::new(config.safety.limits.clone()));

        let publisher = Publisher::from_config(&config.publish)?;

        info!(
            instrument = %instrument.full_name,
            source = %config.source_tag,
            hours = config.hours.enabled,
            safety = config.safety.enabled,
            "Signal pipeline started"
        );

        Ok(Self {
            instrument,
            source_tag: config.source_tag.clone(),
            qty: config.qty,
            stop_loss_ticks: config.stop_loss_ticks,
            profit_offset_ticks: config.profit_offset_ticks,
            emit_historical: config.emit_historical_signals,
            flatten: config.flatten.clone(),
            manual_window,
            publisher,
            resolver,
            gate,
            grant: Some(grant),
            realtime: false,
        })
    }

    /// Per-bar admission check: safety gate first, then trading hours.
    /// Disabled components pass unconditionally.
    pub fn permits_trading(&mut self, now: NaiveDateTime) -> bool {
        if let Some(gate) = &mut self.gate {
            if !gate.check(now.date()).is_allowed() {
                return false;
            }
        }
        if let Some(resolver) = &self.resolver {
            if !resolver.is_open(now, &self.instrument.symbol) {
                return false;
            }
        }
        true
    }

    /// Encode one signal and offer it to every channel.
    ///
    /// Backfilled (non-live) bars are suppressed unless the config
    /// opts in to historical emission.
    pub fn publish(&mut self, action: StrategyAction, confidence: f32, at: DateTime<Utc>) {
        if !self.realtime && !self.emit_historical {
            debug!(%action, "Historical bar, signal suppressed");
            return;
        }
        if self.instrument.symbol.trim().is_empty() {
            return;
        }

        let ticks = TickOffsets::for_action(action, self.stop_loss_ticks, self.profit_offset_ticks);
        let signal = Signal::new(
            self.instrument.symbol.clone(),
            self.instrument.full_name.clone(),
            action,
            ticks,
            self.qty,
            confidence,
            self.source_tag.clone(),
            at,
        );
        self.publisher.publish(&signal);
    }

    /// Count one accepted entry decision against the daily cap.
    /// Call once per decision, not once per order leg.
    pub fn record_entry(&mut self) {
        if let Some(gate) = &mut self.gate {
            gate.record_entry();
        }
    }

    /// Refresh the daily P&L from the latest position valuation.
    pub fn update_daily_pnl(&mut self, unrealized: rust_decimal::Decimal) {
        if let Some(gate) = &mut self.gate {
            gate.update_pnl(unrealized);
        }
    }

    /// The host has transitioned from historical replay to live data.
    pub fn mark_realtime(&mut self) {
        self.realtime = true;
        info!(instrument = %self.instrument.full_name, "Transitioned to real-time");
    }

    #[must_use]
    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Whether the bar falls in the flatten window before the manual
    /// session end.
    #[must_use]
    pub fn should_flatten(&self, now: NaiveDateTime) -> bool {
        if !self.flatten.enabled {
            return false;
        }
        let end = self.manual_window.end;
        let start = end - Duration::minutes(i64::from(self.flatten.lead_minutes));
        window_contains(start, end, now.time())
    }

    /// Close all channels and give back the exclusivity key. Safe to
    /// call repeatedly and from the host's terminal state.
    pub fn shutdown(&mut self) {
        self.publisher.shutdown();
        if let Some(mut grant) = self.grant.take() {
            let trades = self.gate.as_ref().map(SafetyGate::trades_today);
            let pnl = self.gate.as_ref().map(SafetyGate::daily_pnl);
            info!(
                instrument = %self.instrument.full_name,
                ?trades,
                ?pnl,
                "Signal pipeline shut down"
            );
            grant.release();
        }
    }
}

impl Drop for SignalPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
