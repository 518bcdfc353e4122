//! Static fallback rates for when no real data is available at all.

use crate::snapshot::{RateSnapshot, RateSource};

/// USD to AMD rate used when no market data has ever been fetched.
pub const USD_TO_AMD: f64 = 380.0;

/// USD to EUR rate used when no market data has ever been fetched.
pub const USD_TO_EUR: f64 = 0.92;

/// Build a fallback snapshot from the hardcoded constants.
///
/// Pure function, no I/O, always succeeds. Rate values are constant but
/// the timestamp is taken fresh on every call.
pub fn snapshot() -> RateSnapshot {
    RateSnapshot::from_clearing(USD_TO_AMD, USD_TO_AMD / USD_TO_EUR, RateSource::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_values() {
        let fallback = snapshot();

        assert_eq!(fallback.source, RateSource::Fallback);
        assert_eq!(fallback.usd_to_amd, 380.0);
        assert_eq!(fallback.usd_to_eur, 0.92);
        assert!((fallback.amd_to_usd - 0.00263).abs() < 1e-9);
        assert!((fallback.eur_to_amd - 413.04).abs() < 1e-9);
        assert!(fallback.is_well_formed());
    }

    #[test]
    fn test_fallback_timestamp_is_fresh_per_call() {
        let first = snapshot();
        let second = snapshot();

        assert!(second.timestamp >= first.timestamp);
        assert_eq!(first.usd_to_amd, second.usd_to_amd);
    }
}
