//! Timestamp type used for transaction expiration and head-block time.
//!
//! Timestamps are Unix epoch seconds (UTC), matching the ledger's
//! second-resolution `time_point_sec`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u32);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u32) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A clock set before the epoch reads as the epoch.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// This timestamp moved forward by `secs`, saturating at the maximum.
    pub fn plus_secs(&self, secs: u32) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Whether `now` is at or past this timestamp.
    pub fn has_passed(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_saturates() {
        assert_eq!(Timestamp::new(10).plus_secs(30), Timestamp::new(40));
        assert_eq!(Timestamp::new(u32::MAX).plus_secs(1), Timestamp::new(u32::MAX));
    }

    #[test]
    fn has_passed_is_inclusive() {
        let t = Timestamp::new(100);
        assert!(!t.has_passed(Timestamp::new(99)));
        assert!(t.has_passed(Timestamp::new(100)));
    }
}
