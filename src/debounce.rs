//! Single-threaded debounce timer. Each trigger replaces the pending deadline,
//! so the action fires once the input has been quiet for the full delay.

use std::time::{Duration, Instant};

/// Default quiet period before a deferred recompute fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Timer-with-reset driven by the caller's clock.
///
/// The debouncer never sleeps or spawns anything. The event loop asks
/// `time_until_due` how long it may block and calls `poll` afterwards.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl Debouncer {
    /// Creates an idle debouncer with the given quiet period
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Creates an idle debouncer from a delay in milliseconds
    pub const fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// Schedules the deferred action, cancelling any pending one
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drops the pending action, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true if an action is waiting for its quiet period
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending action is due.
    /// Returns None when nothing is pending and `Duration::ZERO` once overdue.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns true exactly once when the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_debouncer_never_fires() {
        let mut debouncer = Debouncer::default();
        let now = Instant::now();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(now + Duration::from_secs(10)));
        assert_eq!(debouncer.time_until_due(now), None);
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let mut debouncer = Debouncer::from_millis(1000);
        let start = Instant::now();
        debouncer.trigger(start);

        assert!(!debouncer.poll(start + Duration::from_millis(999)));
        assert!(debouncer.poll(start + Duration::from_millis(1000)));
        // Fires only once per trigger
        assert!(!debouncer.poll(start + Duration::from_millis(2000)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_retrigger_resets_deadline() {
        let mut debouncer = Debouncer::from_millis(1000);
        let start = Instant::now();
        debouncer.trigger(start);
        debouncer.trigger(start + Duration::from_millis(800));

        // The first deadline has passed but was replaced
        assert!(!debouncer.poll(start + Duration::from_millis(1500)));
        assert!(debouncer.poll(start + Duration::from_millis(1800)));
    }

    #[test]
    fn test_cancel_drops_pending_action() {
        let mut debouncer = Debouncer::from_millis(50);
        let start = Instant::now();
        debouncer.trigger(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_time_until_due() {
        let mut debouncer = Debouncer::from_millis(1000);
        let start = Instant::now();
        debouncer.trigger(start);

        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(400)),
            Some(Duration::from_millis(600))
        );
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(1400)),
            Some(Duration::ZERO)
        );
    }
}
