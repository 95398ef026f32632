//! Schedule documents and window comparison.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day's trading window as returned by the schedule service.
///
/// Times are wall-clock "HH:MM" strings without a date. A window may
/// wrap midnight: start > end means the session spans the day boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradingWindow {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl TradingWindow {
    /// Parse the start time, if present and well-formed.
    pub fn start_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start, "%H:%M").ok()
    }

    /// Parse the end time, if present and well-formed.
    pub fn end_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.end, "%H:%M").ok()
    }

    /// Whether either bound is missing; an empty window is an explicit
    /// no-trade day.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() || self.end.is_empty()
    }
}

/// Weekly-schedule document from the remote service.
///
/// Keys of `weekly_schedule` are lowercase English weekday names; an
/// absent key means no session that day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradingHoursResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub weekly_schedule: HashMap<String, TradingWindow>,
}

/// Configured manual trading window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ManualWindow {
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether `time` falls inside the window, inclusive on both ends.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        window_contains(self.start, self.end, time)
    }
}

/// Inclusive window comparison with overnight wrap.
///
/// start > end means the session spans midnight: allowed iff
/// `time >= start OR time <= end`.
#[must_use]
pub fn window_contains(start: NaiveTime, end: NaiveTime, time: NaiveTime) -> bool {
    if start <= end {
        time >= start && time <= end
    } else {
        time >= start || time <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_daytime_window() {
        let window = ManualWindow::new(t(8, 31), t(16, 0));
        assert!(window.contains(t(8, 31)));
        assert!(window.contains(t(12, 0)));
        assert!(window.contains(t(16, 0)));
        assert!(!window.contains(t(8, 30)));
        assert!(!window.contains(t(16, 1)));
    }

    #[test]
    fn test_overnight_window_wraps_midnight() {
        let window = ManualWindow::new(t(22, 0), t(6, 0));
        assert!(window.contains(t(23, 30)));
        assert!(window.contains(t(2, 0)));
        assert!(!window.contains(t(12, 0)));
    }

    #[test]
    fn test_trading_window_parses_hh_mm() {
        let window = TradingWindow {
            start: "09:30".to_string(),
            end: "16:00".to_string(),
        };
        assert_eq!(window.start_time(), Some(t(9, 30)));
        assert_eq!(window.end_time(), Some(t(16, 0)));
        assert!(!window.is_empty());
    }

    #[test]
    fn test_empty_window_is_flagged() {
        assert!(TradingWindow::default().is_empty());
        let half = TradingWindow {
            start: "09:30".to_string(),
            end: String::new(),
        };
        assert!(half.is_empty());
    }

    #[test]
    fn test_garbage_times_fail_to_parse() {
        let window = TradingWindow {
            start: "9am".to_string(),
            end: "late".to_string(),
        };
        assert_eq!(window.start_time(), None);
        assert_eq!(window.end_time(), None);
    }

    #[test]
    fn test_response_deserializes_with_missing_days() {
        let json = r#"{
            "symbol": "ES_F",
            "timezone": "America/New_York",
            "weekly_schedule": {
                "monday": {"start": "09:30", "end": "16:00"},
                "friday": {"start": "09:30", "end": "13:00"}
            }
        }"#;
        let response: TradingHoursResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.weekly_schedule.len(), 2);
        assert!(!response.weekly_schedule.contains_key("saturday"));
    }
}
