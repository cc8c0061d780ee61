//! Poll window
//!
//! The lower bound (Unix seconds) of the next status query. It only ever
//! moves forward, by exactly one retry period per cycle.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PollWindow {
    from_date: i64,
}

impl PollWindow {
    /// Creates a window at an explicit timestamp
    pub fn new(from_date: i64) -> Self {
        Self { from_date }
    }

    /// Creates the initial window: one retry period before `now`
    pub fn starting_at(now: i64, retry_period: Duration) -> Self {
        Self::new(now.saturating_sub(period_secs(retry_period)))
    }

    /// Unix timestamp sent as the `from_date` query parameter
    pub fn from_date(&self) -> i64 {
        self.from_date
    }

    /// Moves the window forward by exactly `retry_period`
    pub fn advance(&mut self, retry_period: Duration) {
        self.from_date = self.from_date.saturating_add(period_secs(retry_period));
    }
}

impl fmt::Display for PollWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "from_date={}", self.from_date)
    }
}

fn period_secs(period: Duration) -> i64 {
    i64::try_from(period.as_secs()).unwrap_or(i64::MAX)
}
