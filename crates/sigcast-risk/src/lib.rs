//! Live-trading safety for the signal pipeline.
//!
//! Two independent guards:
//! - `SafetyGate`: per-day trade-count and loss limits with lazy
//!   day-rollover reset
//! - `InstanceRegistry`: at most one active publishing instance per
//!   (account, instrument) key, process-wide

pub mod error;
pub mod gate;
pub mod registry;

pub use error::{RiskError, RiskResult};
pub use gate::{DenyReason, GateDecision, SafetyGate, SafetyLimits};
pub use registry::{InstanceGrant, InstanceKey, InstanceRegistry};
