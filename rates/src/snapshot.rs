//! Rate snapshots and their cross-rate arithmetic.

use dramex_common::{now_millis, round_rate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a snapshot's rate values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// Freshly fetched from the upstream page.
    #[serde(rename = "rate.am")]
    RateAm,
    /// Synthesized from hardcoded constants; no real data was available.
    #[serde(rename = "fallback")]
    Fallback,
    /// A previously fetched snapshot re-served after a failed refresh.
    #[serde(rename = "cached-fallback")]
    CachedFallback,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::RateAm => "rate.am",
            RateSource::Fallback => "fallback",
            RateSource::CachedFallback => "cached-fallback",
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One complete, immutable set of cross-rates between USD, AMD and EUR.
///
/// Snapshots are value objects: they are replaced wholesale, never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub usd_to_amd: f64,
    pub amd_to_usd: f64,
    pub usd_to_eur: f64,
    pub eur_to_usd: f64,
    pub eur_to_amd: f64,
    pub amd_to_eur: f64,
    /// Acquisition instant, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub source: RateSource,
}

impl RateSnapshot {
    /// Build a snapshot from the two base clearing rates, both quoted in
    /// AMD per unit.
    ///
    /// The four remaining fields derive from reciprocals and the EUR/USD
    /// cross. Every field is rounded independently (two decimals at or
    /// above one, five below), so reciprocal pairs are only approximately
    /// inverse.
    pub fn from_clearing(usd_to_amd: f64, eur_to_amd: f64, source: RateSource) -> Self {
        let amd_to_usd = 1.0 / usd_to_amd;
        let amd_to_eur = 1.0 / eur_to_amd;
        let eur_to_usd = eur_to_amd * amd_to_usd;
        let usd_to_eur = 1.0 / eur_to_usd;

        Self {
            usd_to_amd: round_rate(usd_to_amd),
            amd_to_usd: round_rate(amd_to_usd),
            usd_to_eur: round_rate(usd_to_eur),
            eur_to_usd: round_rate(eur_to_usd),
            eur_to_amd: round_rate(eur_to_amd),
            amd_to_eur: round_rate(amd_to_eur),
            timestamp: now_millis(),
            source,
        }
    }

    /// Copy of this snapshot relabeled with a different source.
    ///
    /// Rate values and the original timestamp are preserved.
    pub fn relabel(&self, source: RateSource) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    /// Whether every rate field is strictly positive and finite.
    pub fn is_well_formed(&self) -> bool {
        [
            self.usd_to_amd,
            self.amd_to_usd,
            self.usd_to_eur,
            self.eur_to_usd,
            self.eur_to_amd,
            self.amd_to_eur,
        ]
        .iter()
        .all(|rate| rate.is_finite() && *rate > 0.0)
    }
}
