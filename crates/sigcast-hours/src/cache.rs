//! Process-wide schedule cache.

use crate::schedule::TradingHoursResponse;
use dashmap::DashMap;

/// Cache of fetched weekly schedules, keyed by `"{root}_{date}"`.
///
/// Entries are immutable once stored and never expire: a given
/// (root, calendar date) pair is only ever fetched once per process.
/// Shared across strategy instances via `Arc`; concurrent first
/// lookups racing to fill the same key are benign since the fetched
/// content is identical, last writer wins.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: DashMap<String, TradingHoursResponse>,
}

impl ScheduleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<TradingHoursResponse> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn insert(&self, key: String, response: TradingHoursResponse) {
        self.entries.insert(key, response);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_get() {
        let cache = ScheduleCache::new();
        assert!(cache.get("ES_2026-03-02").is_none());

        cache.insert("ES_2026-03-02".to_string(), TradingHoursResponse::default());
        assert!(cache.get("ES_2026-03-02").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = ScheduleCache::new();
        let first = TradingHoursResponse {
            symbol: "ES_F".to_string(),
            ..TradingHoursResponse::default()
        };
        let second = TradingHoursResponse {
            symbol: "ES_F".to_string(),
            timezone: "America/Chicago".to_string(),
            ..TradingHoursResponse::default()
        };
        cache.insert("ES_2026-03-02".to_string(), first);
        cache.insert("ES_2026-03-02".to_string(), second);

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("ES_2026-03-02").unwrap().timezone,
            "America/Chicago"
        );
    }
}
