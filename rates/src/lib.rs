//! Dramex Rate Service
//!
//! Acquires, normalizes, caches and serves USD/AMD/EUR exchange rates,
//! shielding callers from upstream unavailability.
//!
//! # Features
//!
//! - Upstream fetch with structural extraction of clearing rates
//! - Single-snapshot cache with lazy 24-hour TTL
//! - Stale-cache reuse and static-fallback degradation
//! - Single-flight refresh under concurrent load
//!
//! # Example
//!
//! ```rust,ignore
//! use dramex_rates::{RateAmFetcher, RateService};
//! use std::sync::Arc;
//!
//! let service = RateService::new(Arc::new(RateAmFetcher::new()));
//!
//! // Never fails: degrades through stale cache to static fallback.
//! let snapshot = service.get_exchange_rates().await;
//! println!("1 USD = {} AMD", snapshot.usd_to_amd);
//! ```

pub mod cache;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod service;
pub mod snapshot;

pub use cache::{Freshness, SnapshotCache};
pub use error::{RateError, RateResult};
#[cfg(any(test, feature = "test-utils"))]
pub use fetcher::MockFetcher;
pub use fetcher::{RateAmFetcher, UpstreamFetcher};
pub use service::{RateService, RateServiceConfig};
pub use snapshot::{RateSnapshot, RateSource};
