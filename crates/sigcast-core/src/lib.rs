//! Core domain types for the sigcast signal pipeline.
//!
//! This crate provides the types shared by every pipeline stage:
//! - `StrategyAction`: closed enumeration of signal kinds with fixed wire codes
//! - `TickOffsets`: per-action policy for the stop/target tick fields
//! - `Signal`: the fully resolved value struct handed to the frame codec

pub mod action;
pub mod error;
pub mod signal;

pub use action::{StrategyAction, TickOffsets};
pub use error::{CoreError, Result};
pub use signal::Signal;
