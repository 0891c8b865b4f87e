// Debounce timer as an explicit state machine over a caller-supplied clock
// Each trigger restarts the window (last mutation wins); firing is driven by
// pump calls, which keeps every timing path testable without wall-clock waits.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Pending(Instant),
}

#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    state: TimerState,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: TimerState::Idle,
        }
    }

    /// Starts or restarts the window from `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.state = TimerState::Pending(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
    }

    pub fn isPending(&self) -> bool {
        matches!(self.state, TimerState::Pending(_))
    }

    /// Returns true exactly once when the deadline has passed, resetting to
    /// idle. Repeated triggers inside the window push the deadline out.
    pub fn fireDue(&mut self, now: Instant) -> bool {
        match self.state {
            TimerState::Pending(deadline) if now >= deadline => {
                self.state = TimerState::Idle;
                true
            }
            _ => false,
        }
    }
}
