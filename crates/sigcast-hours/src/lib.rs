//! Trading-window resolution.
//!
//! Decides, per bar, whether publication/trading is allowed right now:
//! - manual mode compares against a configured daily window
//! - remote mode consults a weekly-schedule service through a
//!   process-wide cache, falling back to the manual window when the
//!   service is unreachable
//!
//! An explicitly absent or empty day in a fetched schedule is a
//! no-trade day, not a fallback case.

pub mod cache;
pub mod client;
pub mod error;
pub mod resolver;
pub mod schedule;

pub use cache::ScheduleCache;
pub use client::{HttpScheduleClient, ScheduleSource};
pub use error::{HoursError, HoursResult};
pub use resolver::{normalize_root, weekday_key, HoursMode, WindowResolver};
pub use schedule::{window_contains, ManualWindow, TradingHoursResponse, TradingWindow};
