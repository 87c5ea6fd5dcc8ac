//! Clock abstraction for signing timestamps.
//!
//! # Design Decisions
//! - Handlers read time through `Arc<dyn Clock>` so tests can pin the
//!   timestamp and get byte-identical signatures
//! - Millisecond precision, matching what the upstream verifies against
//!   its receive window

use chrono::Utc;

/// Source of wall-clock time for signature timestamps.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a fixed instant, for deterministic signatures in tests.
#[derive(Debug, Clone)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_2023() {
        let clock = SystemClock;
        assert!(clock.now_millis() > 1_672_531_200_000); // 2023-01-01
    }

    #[test]
    fn test_fixed_clock_returns_pinned_value() {
        let clock = FixedClock(1_700_000_000_000);
        assert_eq!(clock.now_millis(), 1_700_000_000_000);
        assert_eq!(clock.now_millis(), 1_700_000_000_000);
    }
}
