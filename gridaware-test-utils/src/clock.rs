//! Manually advanced clock for cache-expiry tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use gridaware_provider::Clock;
use std::sync::Mutex;

/// A `Clock` whose time only moves when the test says so.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Start at a fixed, arbitrary instant so tests are reproducible.
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn starting_at(instant: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(instant),
        }
    }

    /// Move time forward.
    pub fn advance(&self, seconds: i64) {
        if let Ok(mut now) = self.now.lock() {
            *now += Duration::seconds(seconds);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|n| *n).unwrap_or_else(|_| Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_advance_moves_time() {
        let clock = ManualClock::new();
        let before = clock.now();
        clock.advance(600);
        assert_eq!(clock.now() - before, Duration::seconds(600));
    }

    #[test]
    fn test_shared_handle_sees_advance() {
        let clock = Arc::new(ManualClock::new());
        let handle = clock.clone();
        clock.advance(30);
        assert_eq!(handle.now(), clock.now());
    }
}
