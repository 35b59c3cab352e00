//! Time sources for note timestamps.

use std::cell::Cell;
use std::rc::Rc;

/// Supplies wall-clock time as Unix milliseconds (UTC).
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A hand-driven clock. Clones share the same time, so a test can keep one
/// handle and advance the clock a store holds.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_millis)),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// Hands out strictly increasing stamps even when the clock stalls or steps back.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MonotonicStamp {
    last: i64,
}

impl MonotonicStamp {
    pub(crate) fn next(&mut self, now: i64) -> i64 {
        let stamp = now.max(self.last + 1);
        self.last = stamp;
        stamp
    }

    /// Moves the floor up to `seen` so later stamps sort after loaded data.
    pub(crate) fn observe(&mut self, seen: i64) {
        self.last = self.last.max(seen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(10);
        let handle = clock.clone();
        handle.advance(5);
        assert_eq!(clock.now_millis(), 15);
        handle.set(3);
        assert_eq!(clock.now_millis(), 3);
    }

    #[test]
    fn test_monotonic_stamp_never_repeats() {
        let mut stamp = MonotonicStamp::default();
        assert_eq!(stamp.next(100), 100);
        assert_eq!(stamp.next(100), 101);
        assert_eq!(stamp.next(50), 102);
        assert_eq!(stamp.next(200), 200);
    }

    #[test]
    fn test_monotonic_stamp_observe_raises_floor() {
        let mut stamp = MonotonicStamp::default();
        stamp.observe(500);
        assert_eq!(stamp.next(10), 501);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
