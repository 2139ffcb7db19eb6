//! Timestamp provider trait.
//!
//! The logger stamps every row with a monotonic uptime and, when available, a
//! wall-clock datetime string. On device the datetime comes from an optional
//! RTC or a user-set clock; when neither exists rows carry the literal `--`.
//! The provider is injected so hosts and tests control time explicitly.

use std::time::Instant;

/// Placeholder rendered when no wall-clock source is available.
pub const NO_DATETIME: &str = "--";

/// Source of timestamps for log rows and flush scheduling.
pub trait Clock {
    /// Milliseconds of monotonic uptime since an arbitrary epoch.
    fn uptime_ms(&self) -> u64;

    /// Wall-clock datetime string, if a wall clock exists.
    ///
    /// The default implementation reports no wall clock, which renders as
    /// [`NO_DATETIME`] in log rows.
    fn datetime(&self) -> Option<String> {
        None
    }
}

/// Render a clock's datetime for a CSV row.
pub(crate) fn datetime_or_placeholder<C: Clock>(clock: &C) -> String {
    clock.datetime().unwrap_or_else(|| NO_DATETIME.to_string())
}

/// Process-uptime clock backed by [`Instant`]. No wall clock.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn uptime_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.uptime_ms();
        let b = clock.uptime_ms();
        assert!(b >= a);
    }

    #[test]
    fn missing_wall_clock_renders_placeholder() {
        let clock = SystemClock::new();
        assert_eq!(datetime_or_placeholder(&clock), "--");
    }
}
