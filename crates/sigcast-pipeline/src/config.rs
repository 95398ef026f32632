//! Pipeline configuration.
//!
//! Loaded from TOML; every field has a default mirroring the original
//! live-strategy property defaults, so a partial file is valid.

use crate::error::{PipelineError, PipelineResult};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sigcast_hours::{HoursMode, ManualWindow};
use sigcast_risk::SafetyLimits;
use sigcast_transport::PublisherConfig;
use std::path::Path;

/// Trading-hours configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursConfig {
    /// Master toggle; disabled means every bar passes the window check.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: HoursMode,
    /// Base URL of the trading-hours service (remote mode).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Micro contract flag; shifts the instrument-root extraction.
    #[serde(default)]
    pub is_micro: bool,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_start_minute")]
    pub start_minute: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default)]
    pub end_minute: u32,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://moonshots:8000/api".to_string()
}

fn default_start_hour() -> u32 {
    8
}

fn default_start_minute() -> u32 {
    31
}

fn default_end_hour() -> u32 {
    16
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: HoursMode::default(),
            base_url: default_base_url(),
            is_micro: false,
            start_hour: default_start_hour(),
            start_minute: default_start_minute(),
            end_hour: default_end_hour(),
            end_minute: 0,
        }
    }
}

impl HoursConfig {
    /// The configured manual window, validated.
    pub fn manual_window(&self) -> PipelineResult<ManualWindow> {
        let start = NaiveTime::from_hms_opt(self.start_hour, self.start_minute, 0)
            .ok_or_else(|| {
                PipelineError::Config(format!(
                    "Invalid manual start time {}:{:02}",
                    self.start_hour, self.start_minute
                ))
            })?;
        let end = NaiveTime::from_hms_opt(self.end_hour, self.end_minute, 0).ok_or_else(|| {
            PipelineError::Config(format!(
                "Invalid manual end time {}:{:02}",
                self.end_hour, self.end_minute
            ))
        })?;
        Ok(ManualWindow::new(start, end))
    }
}

/// Live-trading safety configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Daily loss/trade-count limits are opt-in, as in the original
    /// strategy.
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub limits: SafetyLimits,
}

/// Flatten-before-session-end configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How many minutes before the manual session end to start
    /// flattening.
    #[serde(default = "default_flatten_lead_minutes")]
    pub lead_minutes: u32,
}

fn default_flatten_lead_minutes() -> u32 {
    15
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lead_minutes: default_flatten_lead_minutes(),
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source strategy tag stamped into every frame.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
    /// Position quantity carried in entry signals.
    #[serde(default = "default_qty")]
    pub qty: i32,
    /// Protective stop distance in ticks.
    #[serde(default = "default_stop_loss_ticks")]
    pub stop_loss_ticks: i32,
    /// Profit target offset beyond the stop, in ticks.
    #[serde(default = "default_profit_offset_ticks")]
    pub profit_offset_ticks: i32,
    /// Emit signals from backfilled (non-live) bars too.
    #[serde(default)]
    pub emit_historical_signals: bool,
    #[serde(default)]
    pub publish: PublisherConfig,
    #[serde(default)]
    pub hours: HoursConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub flatten: FlattenConfig,
}

fn default_source_tag() -> String {
    "AtomSetupV2".to_string()
}

fn default_qty() -> i32 {
    1
}

fn default_stop_loss_ticks() -> i32 {
    35
}

fn default_profit_offset_ticks() -> i32 {
    30
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_tag: default_source_tag(),
            qty: default_qty(),
            stop_loss_ticks: default_stop_loss_ticks(),
            profit_offset_ticks: default_profit_offset_ticks(),
            emit_historical_signals: false,
            publish: PublisherConfig::default(),
            hours: HoursConfig::default(),
            safety: SafetyConfig::default(),
            flatten: FlattenConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from `SIGCAST_CONFIG` or the default path, falling back to
    /// defaults when no file exists.
    pub fn load() -> PipelineResult<Self> {
        let path =
            std::env::var("SIGCAST_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&path).exists() {
            Self::from_file(&path)
        } else {
            tracing::warn!(%path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific TOML file.
    pub fn from_file(path: &str) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config: {e}")))
    }
}
