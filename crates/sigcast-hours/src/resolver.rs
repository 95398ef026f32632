//! The per-bar trading-window decision.

use crate::cache::ScheduleCache;
use crate::client::ScheduleSource;
use crate::schedule::{window_contains, ManualWindow, TradingHoursResponse};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Futures sessions reopen Sunday evening; from this hour a Sunday bar
/// is evaluated against Monday's schedule.
const SUNDAY_ROLLOVER_HOUR: u32 = 17;

/// How the resolver decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursMode {
    /// Compare against the configured manual window only.
    #[default]
    Manual,
    /// Consult the remote weekly schedule, manual as fallback.
    Remote,
}

/// Lowercase weekday key for the schedule lookup, with the
/// Sunday-evening session mapped to Monday.
#[must_use]
pub fn weekday_key(now: NaiveDateTime) -> &'static str {
    let weekday = now.date().weekday();
    if weekday == Weekday::Sun && now.time().hour() >= SUNDAY_ROLLOVER_HOUR {
        debug!("Mapping Sunday evening to Monday trading session");
        return "monday";
    }
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Reduce an instrument symbol to the base futures root used by the
/// schedule service.
///
/// Micro contracts carry a leading "M" (MES, MNQ), so the micro flag
/// selects the second and third characters; otherwise the first two.
/// Symbols too short to slice pass through unchanged.
#[must_use]
pub fn normalize_root(symbol: &str, is_micro: bool) -> String {
    let chars: Vec<char> = symbol.chars().collect();
    if is_micro && chars.len() >= 3 {
        chars[1..3].iter().collect()
    } else if chars.len() >= 2 {
        chars[0..2].iter().collect()
    } else {
        symbol.to_string()
    }
}

fn cache_key(root: &str, now: NaiveDateTime) -> String {
    format!("{root}_{}", now.date().format("%Y-%m-%d"))
}

/// Decides whether publication/trading is allowed at a given bar time.
///
/// Stateless per call; the only shared state is the injected schedule
/// cache, which many resolver instances may point at.
pub struct WindowResolver {
    mode: HoursMode,
    manual: ManualWindow,
    is_micro: bool,
    source: Option<Box<dyn ScheduleSource>>,
    cache: Arc<ScheduleCache>,
}

impl WindowResolver {
    /// Resolver that only ever consults the manual window.
    #[must_use]
    pub fn manual(window: ManualWindow) -> Self {
        Self {
            mode: HoursMode::Manual,
            manual: window,
            is_micro: false,
            source: None,
            cache: Arc::new(ScheduleCache::new()),
        }
    }

    /// Resolver that consults the remote schedule with the manual
    /// window as the degraded fallback.
    #[must_use]
    pub fn remote(
        fallback: ManualWindow,
        is_micro: bool,
        source: Box<dyn ScheduleSource>,
        cache: Arc<ScheduleCache>,
    ) -> Self {
        Self {
            mode: HoursMode::Remote,
            manual: fallback,
            is_micro,
            source: Some(source),
            cache,
        }
    }

    /// Is publication allowed at `now` for this instrument?
    #[must_use]
    pub fn is_open(&self, now: NaiveDateTime, symbol: &str) -> bool {
        match self.mode {
            HoursMode::Manual => self.manual.contains(now.time()),
            HoursMode::Remote => self.is_open_remote(now, symbol),
        }
    }

    fn is_open_remote(&self, now: NaiveDateTime, symbol: &str) -> bool {
        let day_key = weekday_key(now);
        let root = normalize_root(symbol, self.is_micro);
        let key = cache_key(&root, now);

        let hours = match self.lookup_schedule(&key, &root) {
            Some(hours) => hours,
            None => {
                warn!(%root, "Schedule unavailable, falling back to manual trading hours");
                return self.manual.contains(now.time());
            }
        };

        let window = match hours.weekly_schedule.get(day_key) {
            Some(window) if !window.is_empty() => window,
            _ => {
                // Explicit no-trade day. This is policy, not a failure;
                // there is no fallback from it.
                info!(%root, day = day_key, "No trading window defined for this day");
                return false;
            }
        };

        match (window.start_time(), window.end_time()) {
            (Some(start), Some(end)) => window_contains(start, end, now.time()),
            _ => {
                warn!(
                    %root,
                    day = day_key,
                    start = %window.start,
                    end = %window.end,
                    "Unparseable trading window, falling back to manual trading hours"
                );
                self.manual.contains(now.time())
            }
        }
    }

    /// Cache hit, or fetch-and-store. `None` means the fetch failed.
    fn lookup_schedule(&self, key: &str, root: &str) -> Option<TradingHoursResponse> {
        if let Some(hours) = self.cache.get(key) {
            debug!(%key, "Using cached trading hours");
            return Some(hours);
        }

        let source = self.source.as_ref()?;
        match source.fetch(root) {
            Ok(hours) => {
                self.cache.insert(key.to_string(), hours.clone());
                Some(hours)
            }
            Err(e) => {
                warn!(%root, error = %e, "Trading-hours fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockScheduleSource;
    use crate::error::HoursError;
    use crate::schedule::TradingWindow;
    use chrono::{NaiveDate, NaiveTime};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn schedule(days: &[(&str, &str, &str)]) -> TradingHoursResponse {
        TradingHoursResponse {
            symbol: "ES_F".to_string(),
            timezone: "America/New_York".to_string(),
            weekly_schedule: days
                .iter()
                .map(|(day, start, end)| {
                    (
                        day.to_string(),
                        TradingWindow {
                            start: start.to_string(),
                            end: end.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }

    fn fallback() -> ManualWindow {
        ManualWindow::new(t(8, 31), t(16, 0))
    }

    #[test]
    fn test_weekday_key_plain_days() {
        // 2026-03-02 is a Monday
        assert_eq!(weekday_key(at(2026, 3, 2, 12, 0)), "monday");
        assert_eq!(weekday_key(at(2026, 3, 6, 12, 0)), "friday");
        assert_eq!(weekday_key(at(2026, 3, 7, 12, 0)), "saturday");
    }

    #[test]
    fn test_sunday_evening_maps_to_monday() {
        // 2026-03-01 is a Sunday
        assert_eq!(weekday_key(at(2026, 3, 1, 16, 59)), "sunday");
        assert_eq!(weekday_key(at(2026, 3, 1, 17, 0)), "monday");
        assert_eq!(weekday_key(at(2026, 3, 1, 18, 0)), "monday");
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("ES", false), "ES");
        assert_eq!(normalize_root("NQZ6", false), "NQ");
        assert_eq!(normalize_root("MES", true), "ES");
        assert_eq!(normalize_root("MNQ", true), "NQ");
        // Too short to slice: pass through.
        assert_eq!(normalize_root("E", false), "E");
        assert_eq!(normalize_root("ME", true), "ME");
    }

    #[test]
    fn test_manual_mode_overnight_window() {
        let resolver = WindowResolver::manual(ManualWindow::new(t(22, 0), t(6, 0)));
        assert!(resolver.is_open(at(2026, 3, 2, 23, 30), "ES"));
        assert!(resolver.is_open(at(2026, 3, 3, 2, 0), "ES"));
        assert!(!resolver.is_open(at(2026, 3, 2, 12, 0), "ES"));
    }

    #[test]
    fn test_remote_allows_inside_fetched_window() {
        let source = MockScheduleSource::returning(Ok(schedule(&[("monday", "09:30", "16:00")])));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        assert!(resolver.is_open(at(2026, 3, 2, 10, 0), "ES"));
    }

    #[test]
    fn test_remote_denies_outside_fetched_window() {
        let source = MockScheduleSource::returning(Ok(schedule(&[("monday", "09:30", "16:00")])));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        assert!(!resolver.is_open(at(2026, 3, 2, 17, 0), "ES"));
    }

    #[test]
    fn test_absent_day_denies_without_fallback() {
        // The fallback window would allow 10:00, but the fetched
        // schedule explicitly has no Monday session.
        let source = MockScheduleSource::returning(Ok(schedule(&[("tuesday", "09:30", "16:00")])));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        assert!(!resolver.is_open(at(2026, 3, 2, 10, 0), "ES"));
    }

    #[test]
    fn test_empty_window_denies_without_fallback() {
        let source = MockScheduleSource::returning(Ok(schedule(&[("monday", "", "")])));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        assert!(!resolver.is_open(at(2026, 3, 2, 10, 0), "ES"));
    }

    #[test]
    fn test_fetch_failure_falls_back_to_manual() {
        let source =
            MockScheduleSource::returning(Err(HoursError::Fetch("connection refused".into())));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        // Manual window 08:31-16:00 allows 10:00 and denies 20:00.
        assert!(resolver.is_open(at(2026, 3, 2, 10, 0), "ES"));
        assert!(!resolver.is_open(at(2026, 3, 2, 20, 0), "ES"));
    }

    #[test]
    fn test_unparseable_window_falls_back_to_manual() {
        let source = MockScheduleSource::returning(Ok(schedule(&[("monday", "9am", "late")])));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        assert!(resolver.is_open(at(2026, 3, 2, 10, 0), "ES"));
    }

    #[test]
    fn test_second_call_hits_cache() {
        let source = MockScheduleSource::returning(Ok(schedule(&[("monday", "09:30", "16:00")])));
        let cache = Arc::new(ScheduleCache::new());
        let resolver =
            WindowResolver::remote(fallback(), false, Box::new(source), Arc::clone(&cache));

        assert!(resolver.is_open(at(2026, 3, 2, 10, 0), "ES"));
        // The mock yields exactly one response, so a second fetch would
        // fail; the cached document must answer the second call.
        assert!(resolver.is_open(at(2026, 3, 2, 11, 0), "ES"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sunday_evening_uses_monday_window() {
        let source = MockScheduleSource::returning(Ok(schedule(&[("monday", "17:30", "23:00")])));
        let resolver = WindowResolver::remote(
            fallback(),
            false,
            Box::new(source),
            Arc::new(ScheduleCache::new()),
        );
        // 2026-03-01 is a Sunday; 18:00 remaps to Monday's window.
        assert!(resolver.is_open(at(2026, 3, 1, 18, 0), "ES"));
    }
}
