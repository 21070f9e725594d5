//! Time source for event timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Supplies the timestamp recorded on new events.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time truncated to microseconds, the precision `PostgreSQL`
/// stores. An aggregate that records an event therefore holds the same
/// timestamp it will read back after a reload.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}
