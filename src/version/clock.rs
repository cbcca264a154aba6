//! Date source for calendar versioning.

use chrono::{NaiveDate, Utc};

/// Supplies "today" to calendar increments.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the current UTC date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
