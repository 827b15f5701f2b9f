//! Range-aware history cache.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use ticker_core::error::SpanError;
use ticker_core::types::{min_coverage_date, Coverage, SpanRequest};
use tracing::{debug, trace};

/// A cached payload together with the coverage and time it was fetched with.
///
/// Entries are immutable; a write replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<P> {
    pub payload: P,
    /// Earliest instant the payload is known to cover
    pub coverage: Coverage,
    /// When the payload was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Why a lookup did not return a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Nothing stored under the key.
    Absent,
    /// The entry is at least one TTL old.
    Expired,
    /// The entry does not reach back far enough for the request.
    InsufficientCoverage,
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<P> {
    Hit(P),
    Miss(MissReason),
}

impl<P> CacheLookup<P> {
    /// Check if the lookup was a hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Take the payload of a hit.
    pub fn hit(self) -> Option<P> {
        match self {
            CacheLookup::Hit(payload) => Some(payload),
            CacheLookup::Miss(_) => None,
        }
    }
}

/// In-memory cache that serves an entry only while it is fresh and covers
/// the requested span.
///
/// Keys are used as given; callers normalize case. The current instant is
/// always passed in, the cache never reads a clock. Entries are swapped in
/// whole under a write lock, so readers see either the old or the new entry.
#[derive(Debug)]
pub struct RangeCache<P> {
    entries: RwLock<HashMap<String, Arc<CacheEntry<P>>>>,
    ttl: Duration,
}

impl<P: Clone> RangeCache<P> {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Time-to-live of entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up `key` for a `span` of history ending at `now`.
    ///
    /// Hits only when the entry is younger than the TTL and its coverage
    /// reaches back at least as far as `span` requires.
    ///
    /// # Errors
    /// The normalizer's error for a malformed `span` on a present key.
    pub fn get(
        &self,
        key: &str,
        span: &SpanRequest,
        now: DateTime<Utc>,
    ) -> Result<CacheLookup<P>, SpanError> {
        let Some(entry) = self.entry(key) else {
            trace!(key, "cache miss: absent");
            return Ok(CacheLookup::Miss(MissReason::Absent));
        };

        let required = min_coverage_date(span, now)?;

        if now.signed_duration_since(entry.fetched_at) >= self.ttl {
            debug!(key, fetched_at = %entry.fetched_at, "cache miss: expired");
            return Ok(CacheLookup::Miss(MissReason::Expired));
        }

        if !entry.coverage.satisfies(&required) {
            debug!(key, held = ?entry.coverage, ?required, "cache miss: insufficient coverage");
            return Ok(CacheLookup::Miss(MissReason::InsufficientCoverage));
        }

        trace!(key, %span, "cache hit");
        Ok(CacheLookup::Hit(entry.payload.clone()))
    }

    /// Store `payload` for `key` as fetched at `now` for `span`, replacing any
    /// previous entry.
    pub fn set(
        &self,
        key: impl Into<String>,
        payload: P,
        span: &SpanRequest,
        now: DateTime<Utc>,
    ) -> Result<(), SpanError> {
        self.set_many(std::iter::once((key, payload)), span, now)
            .map(|_| ())
    }

    /// Store several payloads fetched together for the same `span` at `now`.
    ///
    /// The coverage is computed once and shared by every entry. Returns the
    /// number of entries written.
    pub fn set_many<K, I>(
        &self,
        payloads: I,
        span: &SpanRequest,
        now: DateTime<Utc>,
    ) -> Result<usize, SpanError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, P)>,
    {
        let coverage = min_coverage_date(span, now)?;

        let fresh: Vec<(String, Arc<CacheEntry<P>>)> = payloads
            .into_iter()
            .map(|(key, payload)| {
                let entry = CacheEntry {
                    payload,
                    coverage,
                    fetched_at: now,
                };
                (key.into(), Arc::new(entry))
            })
            .collect();
        let written = fresh.len();

        self.entries.write().extend(fresh);

        debug!(written, %span, ?coverage, "cache write");
        Ok(written)
    }

    /// Remove the entry for `key`. Returns whether one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// The stored entry for `key`, fresh or not.
    pub fn entry(&self, key: &str) -> Option<Arc<CacheEntry<P>>> {
        self.entries.read().get(key).cloned()
    }

    /// Number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ticker_core::types::SpanUnit;

    fn span(spec: &str) -> SpanRequest {
        spec.parse().unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 15, 10, 30, 0).unwrap()
    }

    fn cache() -> RangeCache<&'static str> {
        RangeCache::new(Duration::minutes(3))
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();

        let now = t0() + cache.ttl() - Duration::seconds(1);
        assert_eq!(cache.get("AAPL", &span("1y"), now).unwrap(), CacheLookup::Hit("bars"));
    }

    #[test]
    fn test_miss_after_ttl() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();

        let later = t0() + cache.ttl() + Duration::seconds(1);
        assert_eq!(
            cache.get("AAPL", &span("1y"), later).unwrap(),
            CacheLookup::Miss(MissReason::Expired)
        );

        // The TTL bound itself is already stale.
        let boundary = t0() + cache.ttl();
        assert!(!cache.get("AAPL", &span("1y"), boundary).unwrap().is_hit());
    }

    #[test]
    fn test_miss_on_insufficient_coverage() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("5d"), t0()).unwrap();

        assert_eq!(
            cache.get("AAPL", &span("1mo"), t0()).unwrap(),
            CacheLookup::Miss(MissReason::InsufficientCoverage)
        );
    }

    #[test]
    fn test_hit_on_broader_coverage() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();

        assert!(cache.get("AAPL", &span("5d"), t0()).unwrap().is_hit());
        assert!(cache.get("AAPL", &span("ytd"), t0()).unwrap().is_hit());
        assert!(!cache.get("AAPL", &span("2y"), t0()).unwrap().is_hit());
    }

    #[test]
    fn test_coverage_moves_with_now() {
        let cache: RangeCache<&str> = RangeCache::new(Duration::days(3));
        cache.set("AAPL", "bars", &span("1d"), t0()).unwrap();

        // Fetched for one day back from t0; the next day needs only today.
        let next_day = t0() + Duration::days(1);
        assert!(cache.get("AAPL", &span("1d"), next_day).unwrap().is_hit());

        let earlier = t0() - Duration::days(1);
        assert!(!cache.get("AAPL", &span("1d"), earlier).unwrap().is_hit());
    }

    #[test]
    fn test_unbounded_requests() {
        let cache = cache();
        cache.set("AAPL", "one-year", &span("1y"), t0()).unwrap();
        assert_eq!(
            cache.get("AAPL", &span("max"), t0()).unwrap(),
            CacheLookup::Miss(MissReason::InsufficientCoverage)
        );

        cache.set("AAPL", "all", &span("max"), t0()).unwrap();
        assert_eq!(cache.get("AAPL", &span("max"), t0()).unwrap(), CacheLookup::Hit("all"));
        assert_eq!(cache.get("AAPL", &span("12y"), t0()).unwrap(), CacheLookup::Hit("all"));
        assert_eq!(cache.get("AAPL", &span("1y"), t0()).unwrap(), CacheLookup::Hit("all"));
    }

    #[test]
    fn test_invalidate_then_miss() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();

        assert!(cache.invalidate("AAPL"));
        assert_eq!(
            cache.get("AAPL", &span("1d"), t0()).unwrap(),
            CacheLookup::Miss(MissReason::Absent)
        );
        assert!(!cache.invalidate("AAPL"));
    }

    #[test]
    fn test_clear() {
        let cache = cache();
        cache.set("AAPL", "a", &span("1y"), t0()).unwrap();
        cache.set("NVDA", "n", &span("1y"), t0()).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.get("NVDA", &span("1d"), t0()).unwrap().is_hit());
    }

    #[test]
    fn test_set_replaces_whole_entry() {
        let cache = cache();
        cache.set("AAPL", "old", &span("10y"), t0()).unwrap();

        let later = t0() + Duration::minutes(1);
        cache.set("AAPL", "new", &span("5d"), later).unwrap();

        let entry = cache.entry("AAPL").unwrap();
        assert_eq!(entry.payload, "new");
        assert_eq!(entry.fetched_at, later);
        // No merge with the earlier, broader coverage.
        assert!(!cache.get("AAPL", &span("1y"), later).unwrap().is_hit());
    }

    #[test]
    fn test_set_is_idempotent() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();
        let first = cache.entry("AAPL").unwrap();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();

        assert_eq!(*cache.entry("AAPL").unwrap(), *first);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_does_not_mutate() {
        let cache = cache();
        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();
        let before = cache.entry("AAPL").unwrap();

        for _ in 0..3 {
            assert_eq!(cache.get("AAPL", &span("1y"), t0()).unwrap(), CacheLookup::Hit("bars"));
        }
        let later = t0() + Duration::hours(1);
        assert!(!cache.get("AAPL", &span("1y"), later).unwrap().is_hit());

        assert_eq!(*cache.entry("AAPL").unwrap(), *before);
    }

    #[test]
    fn test_set_many_shares_coverage() {
        let cache = cache();
        let written = cache
            .set_many([("AAPL", "a"), ("NVDA", "n")], &span("3mo"), t0())
            .unwrap();
        assert_eq!(written, 2);

        let aapl = cache.entry("AAPL").unwrap();
        let nvda = cache.entry("NVDA").unwrap();
        assert_eq!(aapl.coverage, nvda.coverage);
        assert_eq!(aapl.fetched_at, nvda.fetched_at);
    }

    #[test]
    fn test_malformed_span_propagates() {
        let cache = cache();
        let zero = SpanRequest::count(0, SpanUnit::Day);

        assert!(cache.set("AAPL", "bars", &zero, t0()).is_err());
        assert!(cache.is_empty());

        // The span is only normalized once the key is known to be present.
        assert_eq!(
            cache.get("NOPE", &zero, t0()),
            Ok(CacheLookup::Miss(MissReason::Absent))
        );

        cache.set("AAPL", "bars", &span("1y"), t0()).unwrap();
        assert_eq!(
            cache.get("AAPL", &zero, t0()),
            Err(SpanError::InvalidFormat("0d".to_string()))
        );
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let cache: RangeCache<(u64, u64)> = RangeCache::new(Duration::minutes(3));
        let one_year = span("1y");

        std::thread::scope(|scope| {
            for writer in 0..4u64 {
                let cache = &cache;
                let one_year = &one_year;
                scope.spawn(move || {
                    for i in 0..200u64 {
                        cache.set("AAPL", (writer, i), one_year, t0()).unwrap();
                        cache.set(format!("K{writer}"), (writer, i), one_year, t0()).unwrap();
                    }
                });
            }
            for _ in 0..4 {
                let cache = &cache;
                let one_year = &one_year;
                scope.spawn(move || {
                    for _ in 0..200 {
                        if let Some(entry) = cache.entry("AAPL") {
                            assert_eq!(entry.fetched_at, t0());
                            assert!(entry.payload.0 < 4);
                        }
                        let _ = cache.get("AAPL", one_year, t0()).unwrap();
                    }
                });
            }
        });

        assert_eq!(cache.len(), 5);
        for writer in 0..4u64 {
            let key = format!("K{writer}");
            assert_eq!(cache.get(&key, &one_year, t0()).unwrap(), CacheLookup::Hit((writer, 199)));
        }
    }
}
