//! In-memory rate record with TTL-based expiration.

use chrono::{DateTime, Duration, Utc};

/// Default TTL between refreshes: 5 minutes.
pub const DEFAULT_TTL_SECS: i64 = 300;

/// The last successfully fetched rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedRate {
    pub value: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Single-entry cache holding the last good rate and the time of the last
/// refresh attempt, successful or not.
#[derive(Debug)]
pub struct RateCache {
    entry: Option<CachedRate>,
    attempted_at: Option<DateTime<Utc>>,
    /// Time a fetched value stays fresh, and the minimum gap between
    /// refresh attempts.
    pub ttl: Duration,
}

impl RateCache {
    /// Create an empty cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entry: None,
            attempted_at: None,
            ttl,
        }
    }

    /// The cached rate if it is younger than the TTL.
    pub fn fresh(&self) -> Option<CachedRate> {
        let now = Utc::now();
        self.entry.filter(|entry| now - entry.fetched_at < self.ttl)
    }

    /// True when a refresh was attempted less than one TTL ago.
    pub fn recently_attempted(&self) -> bool {
        self.attempted_at
            .is_some_and(|at| Utc::now() - at < self.ttl)
    }

    /// The last good rate regardless of age.
    pub fn last_known(&self) -> Option<CachedRate> {
        self.entry
    }

    /// Store a freshly fetched rate.
    pub fn record_success(&mut self, value: f64) -> CachedRate {
        let now = Utc::now();
        let entry = CachedRate {
            value,
            fetched_at: now,
        };
        self.entry = Some(entry);
        self.attempted_at = Some(now);
        entry
    }

    /// Note a refresh attempt that produced no value.
    pub fn record_failure(&mut self) {
        self.attempted_at = Some(Utc::now());
    }

    /// Forget everything, forcing the next lookup to hit the network.
    pub fn clear(&mut self) {
        self.entry = None;
        self.attempted_at = None;
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_has_nothing() {
        let cache = RateCache::new();
        assert!(cache.fresh().is_none());
        assert!(cache.last_known().is_none());
        assert!(!cache.recently_attempted());
    }

    #[test]
    fn success_is_fresh_within_ttl() {
        let mut cache = RateCache::new();
        cache.record_success(36.5);
        assert_eq!(cache.fresh().map(|e| e.value), Some(36.5));
        assert!(cache.recently_attempted());
    }

    #[test]
    fn expired_entry_is_not_fresh_but_still_known() {
        let mut cache = RateCache::with_ttl(Duration::zero());
        cache.record_success(36.5);
        assert!(cache.fresh().is_none());
        assert!(!cache.recently_attempted());
        assert_eq!(cache.last_known().map(|e| e.value), Some(36.5));
    }

    #[test]
    fn failure_throttles_without_touching_value() {
        let mut cache = RateCache::new();
        cache.record_failure();
        assert!(cache.recently_attempted());
        assert!(cache.last_known().is_none());
    }

    #[test]
    fn clear_resets_both_timestamps() {
        let mut cache = RateCache::new();
        cache.record_success(40.0);
        cache.clear();
        assert!(cache.last_known().is_none());
        assert!(!cache.recently_attempted());
    }
}
