//! Millisecond clocks and single-shot timers.
//!
//! Timers never run code on their own. The owner polls them between detection
//! cycles with the current time, so every deferred action happens on the same
//! thread as the cycle and never in the middle of one.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic millisecond time source.
pub trait Clock: Debug + Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Virtual clock moved by hand. Clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) -> u64 {
        self.now.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Cancellable single-shot deadline.
///
/// Arming replaces any pending deadline; cancelling is always allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline_ms: Option<u64>,
}

impl Timer {
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Fires at most once per arming; returns whether it fired now.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if deadline <= now_ms => {
                self.deadline_ms = None;
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
    fn fires_once_at_deadline() {
        let mut timer = Timer::default();
        timer.arm(100, 50);

        assert!(!timer.fire_if_due(149));
        assert!(timer.fire_if_due(150));
        assert!(!timer.fire_if_due(151));
        assert!(!timer.is_pending());
    }

    #[test]
    fn rearm_replaces_pending_deadline() {
        let mut timer = Timer::default();
        timer.arm(0, 100);
        timer.arm(0, 300);

        assert_eq!(timer.deadline_ms(), Some(300));
        assert!(!timer.fire_if_due(100));
        assert!(timer.fire_if_due(300));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timer = Timer::default();
        timer.cancel();
        timer.arm(0, 10);
        assert!(timer.fire_if_due(10));
        timer.cancel();
        timer.cancel();
        assert!(!timer.fire_if_due(1000));
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let mut timer = Timer::default();
        timer.arm(42, 0);
        assert!(timer.fire_if_due(42));
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(10);
        let view = clock.clone();
        assert_eq!(clock.advance(5), 15);
        assert_eq!(view.now_ms(), 15);
        view.set(1000);
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn system_clock_does_not_go_backwards() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        assert!(clock.now_ms() >= first);
    }
}
