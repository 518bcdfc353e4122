//! Rate service orchestration.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use dramex_common::time::constants;

use crate::cache::SnapshotCache;
use crate::fallback;
use crate::fetcher::UpstreamFetcher;
use crate::snapshot::{RateSnapshot, RateSource};

/// Configuration for the rate service.
#[derive(Debug, Clone)]
pub struct RateServiceConfig {
    /// How long a stored snapshot stays fresh.
    pub ttl: Duration,
}

impl Default for RateServiceConfig {
    fn default() -> Self {
        Self {
            ttl: constants::rate_ttl(),
        }
    }
}

/// Serves exchange rates, shielding callers from upstream unavailability.
///
/// The service owns the single cache instance and exposes one operation;
/// there is no ambient global state.
pub struct RateService {
    fetcher: Arc<dyn UpstreamFetcher>,
    cache: SnapshotCache,
    refresh: Mutex<()>,
}

impl RateService {
    /// Create a service with the default 24-hour TTL.
    pub fn new(fetcher: Arc<dyn UpstreamFetcher>) -> Self {
        Self::with_config(fetcher, RateServiceConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(fetcher: Arc<dyn UpstreamFetcher>, config: RateServiceConfig) -> Self {
        Self {
            fetcher,
            cache: SnapshotCache::new(config.ttl),
            refresh: Mutex::new(()),
        }
    }

    /// Current exchange rates.
    ///
    /// Never fails: a fresh cache is served directly; otherwise one
    /// upstream fetch is attempted, degrading on failure to the previous
    /// snapshot (relabeled `cached-fallback`) and, with nothing cached, to
    /// the static fallback.
    #[instrument(skip(self))]
    pub async fn get_exchange_rates(&self) -> RateSnapshot {
        if let Some(snapshot) = self.cache.fresh() {
            debug!("Serving fresh cached rates");
            return snapshot;
        }

        // Concurrent stale or cold hits wait for one in-flight refresh
        // instead of each issuing a redundant upstream call.
        let _refresh = self.refresh.lock().await;
        if let Some(snapshot) = self.cache.fresh() {
            debug!("Rates were refreshed while waiting");
            return snapshot;
        }

        match self.fetcher.fetch().await {
            Ok(snapshot) => {
                self.cache.store(snapshot.clone());
                info!(
                    provider = self.fetcher.name(),
                    usd_to_amd = snapshot.usd_to_amd,
                    eur_to_amd = snapshot.eur_to_amd,
                    "Refreshed exchange rates"
                );
                snapshot
            }
            Err(e) => {
                warn!(provider = self.fetcher.name(), error = %e, "Upstream fetch failed");
                match self.cache.latest() {
                    Some(previous) => {
                        debug!("Serving previous snapshot as cached fallback");
                        previous.relabel(RateSource::CachedFallback)
                    }
                    None => {
                        debug!("No cached snapshot, serving static fallback");
                        fallback::snapshot()
                    }
                }
            }
        }
    }

    /// Snapshot currently held in the cache, regardless of freshness.
    pub fn cached(&self) -> Option<RateSnapshot> {
        self.cache.latest()
    }
}
