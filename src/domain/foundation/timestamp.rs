//! Timestamp value object for immutable points in time.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    ///
    /// Saturates at the earliest representable instant.
    pub fn minus_seconds(&self, seconds: i64) -> Self {
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| self.0.checked_sub_signed(delta))
            .map(Self)
            .unwrap_or(Self(DateTime::<Utc>::MIN_UTC))
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    ///
    /// Saturates at the latest representable instant.
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
            .unwrap_or(Self(DateTime::<Utc>::MAX_UTC))
    }

    /// RFC 3339 rendering used on the wire.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_seconds_moves_backwards() {
        let now = Timestamp::now();
        let earlier = now.minus_seconds(60);
        assert!(earlier.is_before(&now));
        let elapsed = now.as_datetime().signed_duration_since(*earlier.as_datetime());
        assert_eq!(elapsed.num_seconds(), 60);
    }

    #[test]
    fn out_of_range_offsets_saturate() {
        let now = Timestamp::now();
        assert_eq!(
            now.minus_seconds(10_000_000_000_000).as_datetime(),
            &DateTime::<Utc>::MIN_UTC
        );
        assert_eq!(now.minus_seconds(i64::MAX).as_datetime(), &DateTime::<Utc>::MIN_UTC);
        assert_eq!(now.plus_seconds(i64::MAX).as_datetime(), &DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with('"'));
        assert!(json.contains('T'));
    }
}
