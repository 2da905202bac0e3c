//! Time source used by the poller

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" plus a blocking sleep
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock; sleeps block the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Manually driven clock for deterministic tests.
///
/// `sleep` advances the clock instead of blocking. Clones share state, so a
/// test can keep one handle while the poller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
    sleeps: Rc<Cell<usize>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
            sleeps: Rc::new(Cell::new(0)),
        }
    }

    /// Move time forward without counting a sleep, e.g. to model predicate latency
    pub fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }

    /// Number of `sleep` calls so far
    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_sleep_advances_and_counts() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now();

        clock.sleep(Duration::from_millis(500));
        handle.advance(Duration::from_millis(3));

        assert_eq!(handle.sleeps(), 1);
        assert_eq!(clock.now() - start, Duration::from_millis(503));
        assert_eq!(handle.elapsed(), Duration::from_millis(503));
    }

    #[test]
    fn test_system_clock_sleeps() {
        let clock = SystemClock;
        let start = clock.now();
        clock.sleep(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
