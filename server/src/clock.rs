//! Time source used for cache expiry.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Cache entries are stamped and expired against this clock, so tests
/// can move time forward without sleeping.
pub trait Clock: Send + Sync {
    /// Returns the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
