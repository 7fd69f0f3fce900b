//! Time utilities and constants for dailyrate.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Timing constants.
pub mod constants {
    use super::Duration;

    /// How long a fetched rate table counts as fresh (24 hours).
    pub fn freshness_window() -> Duration {
        Duration::hours(24)
    }

    /// Quiet period before recomputing a conversion after input (300 ms).
    pub fn input_debounce() -> Duration {
        Duration::milliseconds(300)
    }

    /// Rate feed request timeout (10 seconds).
    pub fn request_timeout() -> Duration {
        Duration::seconds(10)
    }
}

/// A timestamp (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis(ts: Timestamp) -> i64 {
    ts.timestamp_millis()
}

/// Timestamp from milliseconds since the Unix epoch.
pub fn from_epoch_millis(millis: i64) -> Option<Timestamp> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Check whether `at` is younger than `window` as of `now`.
///
/// An age of exactly `window` is not fresh.
pub fn is_within(at: Timestamp, now: Timestamp, window: Duration) -> bool {
    now.signed_duration_since(at) < window
}

/// Duration extensions for convenient conversion.
pub trait DurationExt {
    fn as_std(&self) -> std::time::Duration;
}

impl DurationExt for Duration {
    fn as_std(&self) -> std::time::Duration {
        self.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_within() {
        let window = constants::freshness_window();
        let at = now();

        assert!(is_within(at, at + Duration::hours(23), window));
        assert!(!is_within(at, at + Duration::hours(24), window));
        assert!(!is_within(at, at + Duration::hours(25), window));
    }

    #[test]
    fn test_epoch_millis_round_trip() {
        let ts = from_epoch_millis(1_700_000_000_123).unwrap();
        assert_eq!(epoch_millis(ts), 1_700_000_000_123);
    }

    #[test]
    fn test_negative_duration_as_std() {
        assert_eq!(Duration::seconds(-5).as_std(), std::time::Duration::ZERO);
        assert_eq!(Duration::milliseconds(300).as_std(), std::time::Duration::from_millis(300));
    }
}
