//! Frozen time for tests.

use chrono::{DateTime, TimeZone, Utc};
use taleweave_core::clock::Clock;

/// Always reports the instant it was built with.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen `seconds` after [`fixed_now`].
    #[must_use]
    pub fn seconds_after_start(seconds: i64) -> Self {
        Self(fixed_now() + chrono::Duration::seconds(seconds))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The timestamp shared by tests that do not care about the exact time.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}
