//! Shared application state.

use std::sync::Arc;

use dramex_rates::{RateAmFetcher, RateService};

use crate::config::ServerConfig;

/// State shared across request handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub rates: RateService,
}

impl AppState {
    /// Wire up the rate service from configuration.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let fetcher = Arc::new(RateAmFetcher::with_url(config.upstream_url.clone()));

        Arc::new(Self {
            rates: RateService::new(fetcher),
            config,
        })
    }
}
