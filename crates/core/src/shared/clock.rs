use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

/// Longest uninterrupted sleep; cancellation is noticed within one slice.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Time source for acquisition loops.
pub trait Clock: Send + Sync {
    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Local wall-clock time, used for history timestamps.
    fn timestamp(&self) -> NaiveDateTime;

    /// Waits for `duration` unless `cancelled` is raised first.
    /// Returns `false` if the wait was cut short by cancellation.
    fn sleep(&self, duration: Duration, cancelled: &AtomicBool) -> bool;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn timestamp(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn sleep(&self, duration: Duration, cancelled: &AtomicBool) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if cancelled.load(Ordering::Relaxed) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Clock that only moves when something sleeps on it.
    pub struct ManualClock {
        offset: Mutex<Duration>,
        base: NaiveDateTime,
    }

    impl ManualClock {
        pub fn new() -> Self {
            let base = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .unwrap();
            Self {
                offset: Mutex::new(Duration::ZERO),
                base,
            }
        }

        pub fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn elapsed(&self) -> Duration {
            *self.offset.lock().unwrap()
        }

        fn timestamp(&self) -> NaiveDateTime {
            self.base + chrono::Duration::from_std(self.elapsed()).unwrap()
        }

        fn sleep(&self, duration: Duration, cancelled: &AtomicBool) -> bool {
            if cancelled.load(Ordering::Relaxed) {
                return false;
            }
            self.advance(duration);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[test]
    fn test_system_clock_sleep_waits() {
        let clock = SystemClock::new();
        let cancelled = AtomicBool::new(false);
        assert!(clock.sleep(Duration::from_millis(20), &cancelled));
        assert!(clock.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_system_clock_sleep_stops_when_cancelled() {
        let clock = SystemClock::new();
        let cancelled = AtomicBool::new(true);
        assert!(!clock.sleep(Duration::from_secs(30), &cancelled));
        assert!(clock.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_manual_clock_moves_on_sleep() {
        let clock = ManualClock::new();
        let cancelled = AtomicBool::new(false);
        clock.sleep(Duration::from_secs(5), &cancelled);
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
        assert_eq!(clock.timestamp().format("%H:%M:%S").to_string(), "10:00:05");
    }
}
