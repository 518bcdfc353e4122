//! Currency codes and rate rounding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies served by the rate directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Amd,
    Eur,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Amd => "AMD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Decimal places kept when rounding a rate field.
///
/// Sub-unit rates keep five decimals so their significant digits survive;
/// rates at or above one keep two.
pub fn rate_decimals(value: f64) -> u32 {
    if value >= 1.0 {
        2
    } else {
        5
    }
}

/// Round a rate to its fixed per-field precision.
pub fn round_rate(value: f64) -> f64 {
    let factor = 10f64.powi(rate_decimals(value) as i32);
    (value * factor).round() / factor
}
