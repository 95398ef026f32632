//! Strategy-side signal publication pipeline.
//!
//! Ties the stages together the way the host platform's callbacks
//! drive them: per bar, the safety gate and the trading-window
//! resolver decide whether anything may be emitted; the caller then
//! picks an action and `publish` encodes and fans it out.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::{FlattenConfig, HoursConfig, PipelineConfig, SafetyConfig};
pub use error::{PipelineError, PipelineResult};
pub use logging::init_logging;
pub use pipeline::{InstrumentRef, SignalPipeline};
