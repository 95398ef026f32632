//! Remote schedule lookup.
//!
//! `ScheduleSource` is the seam between the resolver and the network,
//! so tests can substitute a canned or failing source.

use crate::error::{HoursError, HoursResult};
use crate::schedule::TradingHoursResponse;
use std::time::Duration;
use tracing::{debug, info};

/// Bound on a single schedule fetch. A slow service degrades to the
/// manual fallback rather than stalling bar processing.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of weekly-schedule documents.
pub trait ScheduleSource: Send + Sync {
    /// Fetch the schedule for a normalized futures root (e.g. "ES").
    fn fetch(&self, root: &str) -> HoursResult<TradingHoursResponse>;
}

/// Blocking HTTP schedule client.
pub struct HttpScheduleClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpScheduleClient {
    /// Create a client against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> HoursResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| HoursError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl ScheduleSource for HttpScheduleClient {
    fn fetch(&self, root: &str) -> HoursResult<TradingHoursResponse> {
        let url = format!("{}/trading-hours?symbol={root}_F", self.base_url);
        debug!(%url, "Fetching trading hours");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| HoursError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HoursError::Fetch(format!("HTTP {status}")));
        }

        let hours: TradingHoursResponse = response
            .json()
            .map_err(|e| HoursError::Malformed(e.to_string()))?;

        info!(
            symbol = %hours.symbol,
            timezone = %hours.timezone,
            days = hours.weekly_schedule.len(),
            "Trading hours fetched"
        );
        Ok(hours)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Canned schedule source for resolver tests. Yields its response
    /// once; any further fetch fails, which lets cache tests prove the
    /// network was not hit twice.
    pub struct MockScheduleSource {
        response: parking_lot::Mutex<Option<HoursResult<TradingHoursResponse>>>,
    }

    impl MockScheduleSource {
        pub fn returning(response: HoursResult<TradingHoursResponse>) -> Self {
            Self {
                response: parking_lot::Mutex::new(Some(response)),
            }
        }
    }

    impl ScheduleSource for MockScheduleSource {
        fn fetch(&self, _root: &str) -> HoursResult<TradingHoursResponse> {
            self.response
                .lock()
                .take()
                .unwrap_or(Err(HoursError::Fetch("exhausted".to_string())))
        }
    }
}
