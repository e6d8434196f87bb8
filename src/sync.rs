//! Search cancellation: a shared abort flag plus a wall-clock deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::board::search::constants::ABORT_CHECK_PERIOD;

/// One clock per search. Workers poll cheaply via a per-worker tick
/// counter; the deadline is only consulted every few thousand ticks.
/// Once the flag is up every search frame unwinds returning a neutral
/// score, and the coordinator discards the aborted iteration.
pub struct AbortClock {
    flag: AtomicBool,
    start: Instant,
    deadline: Option<Instant>,
}

impl AbortClock {
    /// Clock with a soft time budget in milliseconds. The hard
    /// deadline is three times the budget; the coordinator separately
    /// declines to start iterations past half the budget.
    #[must_use]
    pub fn with_budget_ms(budget_ms: f64) -> Self {
        let start = Instant::now();
        AbortClock {
            flag: AtomicBool::new(false),
            start,
            deadline: Some(start + Duration::from_secs_f64(budget_ms.max(0.0) * 3.0 / 1000.0)),
        }
    }

    /// Clock without a deadline (depth-limited search).
    #[must_use]
    pub fn unlimited() -> Self {
        AbortClock {
            flag: AtomicBool::new(false),
            start: Instant::now(),
            deadline: None,
        }
    }

    /// Milliseconds since the search started.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Cleared between iterative-deepening rounds; a lapsed deadline
    /// re-raises the flag on the next poll.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    /// Cheap periodic check. `tics` is worker-local; the deadline is
    /// read once per `ABORT_CHECK_PERIOD + 1` calls.
    #[inline]
    pub fn poll(&self, tics: &mut u32) -> bool {
        *tics = tics.wrapping_add(1);
        if *tics & ABORT_CHECK_PERIOD == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.trigger();
                }
            }
        }
        self.is_aborted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_and_reset() {
        let clock = AbortClock::unlimited();
        assert!(!clock.is_aborted());
        clock.trigger();
        assert!(clock.is_aborted());
        clock.reset();
        assert!(!clock.is_aborted());
    }

    #[test]
    fn test_poll_hits_lapsed_deadline() {
        let clock = AbortClock::with_budget_ms(0.0);
        let mut tics = 0;
        // Drive enough ticks to cross a polling boundary.
        for _ in 0..=ABORT_CHECK_PERIOD {
            clock.poll(&mut tics);
        }
        assert!(clock.is_aborted());
    }

    #[test]
    fn test_unlimited_never_aborts_on_poll() {
        let clock = AbortClock::unlimited();
        let mut tics = 0;
        for _ in 0..=ABORT_CHECK_PERIOD {
            clock.poll(&mut tics);
        }
        assert!(!clock.is_aborted());
    }
}
