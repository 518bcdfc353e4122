//! Time helpers for the rate directory.

use chrono::{DateTime, Duration, Utc};

/// Service timing constants.
pub mod constants {
    use super::Duration;

    /// How long a fetched rate snapshot stays fresh (24 hours).
    pub fn rate_ttl() -> Duration {
        Duration::hours(24)
    }

    /// Lifetime of an issued CSRF token cookie (24 hours).
    pub fn csrf_token_ttl() -> Duration {
        Duration::hours(24)
    }
}

/// A timestamp with timezone (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Current instant as milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
