use std::time::{SystemTime, UNIX_EPOCH};

/// Source of block timestamps, in seconds since the UNIX epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock. Falls back to `0.0` if the system time is before the epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Always returns the same instant. Useful for reproducible block hashes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}
