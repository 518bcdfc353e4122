//! Upstream rate acquisition.

use async_trait::async_trait;
use dramex_common::Currency;
use regex::Regex;
use reqwest::header;
use std::time::Duration;
use tracing::debug;

use crate::error::{RateError, RateResult};
use crate::snapshot::{RateSnapshot, RateSource};

/// Trait for upstream rate fetchers.
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    /// Get the fetcher name.
    fn name(&self) -> &str;

    /// Retrieve one snapshot of current market rates.
    ///
    /// Exactly one attempt per invocation; retry policy belongs to the
    /// caller.
    async fn fetch(&self) -> RateResult<RateSnapshot>;
}

/// Default upstream page listing Armenian bank exchange rates.
pub const UPSTREAM_URL: &str = "https://rate.am/en/armenian-dram-exchange-rates/banks";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Browser-like request signature; the upstream blocks obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Fetches clearing rates from the rate.am page.
///
/// The page embeds a JSON-like data structure holding per-currency
/// `CLEARING` buy/sell pairs; the two pairs this service needs are located
/// structurally rather than by full-document parsing. Any change to the
/// page's embedded format is a breaking dependency.
pub struct RateAmFetcher {
    client: reqwest::Client,
    url: String,
    usd_pattern: Regex,
    eur_pattern: Regex,
}

impl RateAmFetcher {
    /// Create a fetcher against the default upstream URL.
    pub fn new() -> Self {
        Self::with_url(UPSTREAM_URL)
    }

    /// Create a fetcher against a custom upstream URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            usd_pattern: clearing_pattern(Currency::Usd),
            eur_pattern: clearing_pattern(Currency::Eur),
        }
    }

    /// Extract both clearing pairs from a page body and build a snapshot.
    ///
    /// A missing pair is a hard failure so the caller can fall back
    /// deliberately instead of serving silently defaulted rates.
    pub fn parse_snapshot(&self, body: &str) -> RateResult<RateSnapshot> {
        let (usd_buy, usd_sell) = clearing_pair(&self.usd_pattern, Currency::Usd, body)?;
        let (eur_buy, eur_sell) = clearing_pair(&self.eur_pattern, Currency::Eur, body)?;

        let usd_to_amd = (usd_buy + usd_sell) / 2.0;
        let eur_to_amd = (eur_buy + eur_sell) / 2.0;

        if !(usd_to_amd.is_finite() && usd_to_amd > 0.0) {
            return Err(RateError::UpstreamParse(Currency::Usd));
        }
        if !(eur_to_amd.is_finite() && eur_to_amd > 0.0) {
            return Err(RateError::UpstreamParse(Currency::Eur));
        }

        Ok(RateSnapshot::from_clearing(
            usd_to_amd,
            eur_to_amd,
            RateSource::RateAm,
        ))
    }
}

impl Default for RateAmFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamFetcher for RateAmFetcher {
    fn name(&self) -> &str {
        "rate.am"
    }

    async fn fetch(&self) -> RateResult<RateSnapshot> {
        debug!(url = %self.url, "Fetching upstream rates");

        let response = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, ACCEPT)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::UpstreamHttp(format!(
                "unexpected status {status}"
            )));
        }

        let body = response.text().await?;
        self.parse_snapshot(&body)
    }
}

fn clearing_pattern(currency: Currency) -> Regex {
    Regex::new(&format!(
        r#"(?s)"{code}".*?"CLEARING".*?"buy"\s*:\s*([0-9]+(?:\.[0-9]+)?).*?"sell"\s*:\s*([0-9]+(?:\.[0-9]+)?)"#,
        code = currency.code()
    ))
    .expect("clearing pattern compiles")
}

fn clearing_pair(pattern: &Regex, currency: Currency, body: &str) -> RateResult<(f64, f64)> {
    let captures = pattern
        .captures(body)
        .ok_or(RateError::UpstreamParse(currency))?;
    let buy = captures[1]
        .parse::<f64>()
        .map_err(|_| RateError::UpstreamParse(currency))?;
    let sell = captures[2]
        .parse::<f64>()
        .map_err(|_| RateError::UpstreamParse(currency))?;
    Ok((buy, sell))
}

/// Mock fetcher for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockFetcher {
    outcome: parking_lot::Mutex<MockOutcome>,
    delay: Option<Duration>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
#[derive(Clone)]
enum MockOutcome {
    Snapshot(RateSnapshot),
    Failure,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockFetcher {
    /// Create a mock that fails until a snapshot is scripted.
    pub fn new() -> Self {
        Self {
            outcome: parking_lot::Mutex::new(MockOutcome::Failure),
            delay: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Create a mock whose fetches take at least `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// Script the next fetches to return this snapshot.
    pub fn set_snapshot(&self, snapshot: RateSnapshot) {
        *self.outcome.lock() = MockOutcome::Snapshot(snapshot);
    }

    /// Script the next fetches to fail.
    pub fn set_failure(&self) {
        *self.outcome.lock() = MockOutcome::Failure;
    }

    /// Number of fetch invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl UpstreamFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> RateResult<RateSnapshot> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.outcome.lock().clone();
        match outcome {
            MockOutcome::Snapshot(snapshot) => Ok(snapshot),
            MockOutcome::Failure => Err(RateError::UpstreamHttp(
                "mock upstream unavailable".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BODY: &str = r#"<html><head></head><body>
        <script>window.__data = {"rates":{
            "USD":{"CASH":{"buy":378.50,"sell":384.00},"CLEARING":{"buy":379.05,"sell":383.67}},
            "EUR":{"CASH":{"buy":436.00,"sell":446.00},"CLEARING":{"buy":437.98,"sell":444.06}}
        }};</script>
        </body></html>"#;

    fn fetcher() -> RateAmFetcher {
        RateAmFetcher::new()
    }

    #[test]
    fn test_parse_well_formed_body() {
        let snapshot = fetcher().parse_snapshot(SAMPLE_BODY).unwrap();

        assert!((snapshot.usd_to_amd - 381.36).abs() < 1e-9);
        assert!((snapshot.amd_to_usd - 0.00262).abs() < 1e-9);
        assert!((snapshot.eur_to_amd - 441.02).abs() < 1e-9);
        assert_eq!(snapshot.source, RateSource::RateAm);
        assert!(snapshot.is_well_formed());
    }

    #[test]
    fn test_missing_eur_pair_is_a_hard_failure() {
        let body = r#"{"USD":{"CLEARING":{"buy":379.05,"sell":383.67}}}"#;

        let result = fetcher().parse_snapshot(body);

        assert!(matches!(
            result,
            Err(RateError::UpstreamParse(Currency::Eur))
        ));
    }

    #[test]
    fn test_unrecognized_body_is_a_hard_failure() {
        let result = fetcher().parse_snapshot("<html>maintenance page</html>");

        assert!(matches!(
            result,
            Err(RateError::UpstreamParse(Currency::Usd))
        ));
    }

    #[test]
    fn test_zero_rates_are_rejected() {
        let body = r#"{
            "USD":{"CLEARING":{"buy":0,"sell":0}},
            "EUR":{"CLEARING":{"buy":437.98,"sell":444.06}}
        }"#;

        let result = fetcher().parse_snapshot(body);

        assert!(matches!(
            result,
            Err(RateError::UpstreamParse(Currency::Usd))
        ));
    }

    #[tokio::test]
    async fn test_mock_fetcher_scripts_outcomes() {
        let mock = MockFetcher::new();
        assert!(mock.fetch().await.is_err());

        let snapshot = RateSnapshot::from_clearing(381.36, 441.02, RateSource::RateAm);
        mock.set_snapshot(snapshot.clone());

        assert_eq!(mock.fetch().await.unwrap(), snapshot);
        assert_eq!(mock.calls(), 2);
    }
}
