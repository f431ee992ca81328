//! Calendar-day source.
//!
//! The whole system runs on one process-wide reference calendar; every
//! "today" flows through this trait so streak-boundary cases are testable
//! with a pinned date instead of the wall clock.

use chrono::NaiveDate;

/// Provides the current calendar day in the reference timezone.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation (UTC reference calendar).
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// A clock pinned to a fixed day, for tests and replay.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
