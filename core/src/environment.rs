//! Injected environment dependencies.
//!
//! All external effects the core depends on are abstracted behind traits so
//! business logic stays deterministic and testable. Time is the one that
//! matters most here: the departure sweep compares travel dates against
//! "today", and tests must be able to pin that down.

use chrono::{DateTime, NaiveDate, Utc};

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// The reference calendar date, with the time of day zeroed out.
    ///
    /// Bookings dated strictly before this are considered departed.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by the system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
