//! Single-slot debounce for auto-save.
//!
//! Time is passed in explicitly so the same logic drives a browser timer and
//! plain unit tests. A new [`Debouncer::schedule`] always replaces the pending
//! payload and pushes the deadline out; at most one payload is pending.

/// Holds at most one pending payload and the moment it becomes due.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u32,
    pending: Option<(i64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Schedules `payload` to fire `delay` after `now`, dropping any unfired payload.
    ///
    /// Returns `true` if an earlier payload was replaced.
    pub fn schedule(&mut self, now: i64, payload: T) -> bool {
        self.pending
            .replace((now + i64::from(self.delay_ms), payload))
            .is_some()
    }

    /// Takes the pending payload if its deadline has been reached.
    pub fn take_due(&mut self, now: i64) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if now >= deadline => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }

    /// Takes the pending payload regardless of its deadline, e.g. on page unload.
    pub fn take_now(&mut self) -> Option<T> {
        self.pending.take().map(|(_, p)| p)
    }

    /// Drops the pending payload. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The deadline of the pending payload, if any.
    pub fn deadline(&self) -> Option<i64> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_period() {
        let mut d = Debouncer::new(1000);
        assert!(!d.schedule(0, "a"));
        assert_eq!(d.take_due(999), None);
        assert_eq!(d.take_due(1000), Some("a"));
        assert_eq!(d.take_due(5000), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_new_input_replaces_and_reschedules() {
        let mut d = Debouncer::new(1000);
        d.schedule(0, "first");
        assert!(d.schedule(600, "second"));
        assert_eq!(d.deadline(), Some(1600));
        assert_eq!(d.take_due(1000), None);
        assert_eq!(d.take_due(1600), Some("second"));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut d = Debouncer::new(10);
        d.schedule(0, 1);
        assert!(d.cancel());
        assert!(!d.cancel());
        assert_eq!(d.take_due(100), None);
    }

    #[test]
    fn test_take_now_ignores_deadline() {
        let mut d = Debouncer::new(10_000);
        d.schedule(0, "draft");
        assert_eq!(d.take_now(), Some("draft"));
        assert_eq!(d.take_now(), None);
    }
}
