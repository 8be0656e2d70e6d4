//! Depth-1 coalescing queue with trailing-edge delivery.
//!
//! Time is injected by the caller, so the queue never reads a wall clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debounced<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounced<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any pending value and restarts the window at `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        let deadline = now + self.window;
        self.pending = Some((value, deadline));
    }

    /// Takes the pending value once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/debounce.rs"]
mod tests;
