//! Millisecond interval timer polled from the render loop.

/// A repeating timer driven by an external millisecond clock.
///
/// The render loop owns the clock; the timer only remembers when it is due
/// next. Firing reschedules relative to the poll time, so a long stall
/// (suspended terminal, slow frame) yields a single tick instead of a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    /// A timer that fires on the first poll, then every `period_ms`.
    pub fn immediate(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: 0,
        }
    }

    /// A timer whose first tick is one full period after `start_ms`.
    pub fn delayed(period_ms: u64, start_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: start_ms.saturating_add(period_ms),
        }
    }

    /// Period between ticks in milliseconds.
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Returns true if the timer is due at `now_ms`, rescheduling it.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(self.period_ms);
        true
    }

    /// Restart the period from `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms.saturating_add(self.period_ms);
    }
}
