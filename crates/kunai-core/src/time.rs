//! Wall-clock time access
//!
//! The regeneration and training models compute elapsed seconds between
//! stored timestamps and "now". `TimeSource` is the seam that lets the
//! service run against the system clock in production and a fixed clock in
//! tests. Elapsed time is always clamped at zero: a skewed clock must never
//! make a pool regress or a training session accrue negative gain.

use chrono::{DateTime, Utc};

/// Seconds elapsed since `earlier`, clamped at zero
pub fn seconds_passed(earlier: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - earlier).num_milliseconds();
    (millis as f64 / 1000.0).max(0.0)
}

/// Source of the current wall-clock time
pub trait TimeSource: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// System clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
