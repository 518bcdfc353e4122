//! Single-snapshot cache with lazy TTL evaluation.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::snapshot::RateSnapshot;

/// Cache freshness, evaluated lazily on each read; there is no timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing has ever been stored.
    Empty,
    /// Stored snapshot is younger than the TTL.
    Fresh,
    /// Stored snapshot has outlived the TTL. It is retained, not evicted,
    /// so it stays available for stale-fallback reuse.
    Stale,
}

#[derive(Debug, Clone)]
struct Entry {
    snapshot: RateSnapshot,
    fetched_at: DateTime<Utc>,
}

impl Entry {
    fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.fetched_at)
    }
}

/// Holds the single current snapshot and its fetch instant.
///
/// Only successful upstream fetches are stored; degraded snapshots are
/// produced at read time and never written back.
pub struct SnapshotCache {
    slot: RwLock<Option<Entry>>,
    ttl: Duration,
}

impl SnapshotCache {
    /// Create an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    /// Current cache state.
    pub fn freshness(&self) -> Freshness {
        match &*self.slot.read() {
            None => Freshness::Empty,
            Some(entry) if entry.age() < self.ttl => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }

    /// The stored snapshot, only if it is still fresh.
    pub fn fresh(&self) -> Option<RateSnapshot> {
        let slot = self.slot.read();
        match &*slot {
            Some(entry) if entry.age() < self.ttl => Some(entry.snapshot.clone()),
            _ => None,
        }
    }

    /// The stored snapshot regardless of freshness.
    pub fn latest(&self) -> Option<RateSnapshot> {
        self.slot.read().as_ref().map(|entry| entry.snapshot.clone())
    }

    /// Replace the stored snapshot and reset the age clock.
    ///
    /// The incoming timestamp is clamped so accepted snapshots never move
    /// backwards in time.
    pub fn store(&self, mut snapshot: RateSnapshot) {
        let mut slot = self.slot.write();
        if let Some(previous) = &*slot {
            if snapshot.timestamp < previous.snapshot.timestamp {
                snapshot.timestamp = previous.snapshot.timestamp;
            }
        }
        debug!(timestamp = snapshot.timestamp, "Storing snapshot");
        *slot = Some(Entry {
            snapshot,
            fetched_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RateSource;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn make_snapshot() -> RateSnapshot {
        RateSnapshot::from_clearing(381.36, 441.02, RateSource::RateAm)
    }

    #[test]
    fn test_empty_cache() {
        let cache = SnapshotCache::new(Duration::hours(24));

        assert_eq!(cache.freshness(), Freshness::Empty);
        assert!(cache.fresh().is_none());
        assert!(cache.latest().is_none());
    }

    #[test]
    fn test_store_and_read_fresh() {
        let cache = SnapshotCache::new(Duration::hours(24));
        let snapshot = make_snapshot();

        cache.store(snapshot.clone());

        assert_eq!(cache.freshness(), Freshness::Fresh);
        assert_eq!(cache.fresh().unwrap(), snapshot);
        assert_eq!(cache.latest().unwrap(), snapshot);
    }

    #[test]
    fn test_expiry_retains_stale_snapshot() {
        let cache = SnapshotCache::new(Duration::milliseconds(30));
        let snapshot = make_snapshot();

        cache.store(snapshot.clone());
        sleep(StdDuration::from_millis(40));

        assert_eq!(cache.freshness(), Freshness::Stale);
        assert!(cache.fresh().is_none());
        // The stale entry is still there for fallback reuse.
        assert_eq!(cache.latest().unwrap(), snapshot);
    }

    #[test]
    fn test_store_resets_age_clock() {
        let cache = SnapshotCache::new(Duration::milliseconds(30));

        cache.store(make_snapshot());
        sleep(StdDuration::from_millis(40));
        assert_eq!(cache.freshness(), Freshness::Stale);

        cache.store(make_snapshot());
        assert_eq!(cache.freshness(), Freshness::Fresh);
    }

    #[test]
    fn test_timestamps_never_move_backwards() {
        let cache = SnapshotCache::new(Duration::hours(24));
        let first = make_snapshot();
        cache.store(first.clone());

        let mut second = make_snapshot();
        second.timestamp = first.timestamp - 1_000;
        cache.store(second);

        assert_eq!(cache.latest().unwrap().timestamp, first.timestamp);
    }
}
