//! Rate service error types.

use dramex_common::Currency;
use thiserror::Error;

/// Errors that can occur while acquiring rates from the upstream source.
///
/// Both variants are recovered inside [`crate::RateService`]; callers of
/// `get_exchange_rates` never see them.
#[derive(Debug, Error)]
pub enum RateError {
    /// Transport failure or non-success status from the upstream page.
    #[error("Upstream http error: {0}")]
    UpstreamHttp(String),

    /// Expected clearing pair absent from the upstream response body.
    #[error("Clearing pair for {0} not found in upstream response")]
    UpstreamParse(Currency),
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        RateError::UpstreamHttp(err.to_string())
    }
}

/// Result type for rate operations.
pub type RateResult<T> = Result<T, RateError>;
