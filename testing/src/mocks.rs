//! Mock implementations of environment traits.

use chrono::{DateTime, NaiveDate, Utc};
use villagestay_core::environment::Clock;

/// Fixed clock for deterministic tests.
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use villagestay_testing::mocks::FixedClock;
/// use villagestay_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a fixed clock pinned to `time`
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }

    /// Create a fixed clock pinned to midnight UTC on `date`
    #[must_use]
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self {
            time: date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}
