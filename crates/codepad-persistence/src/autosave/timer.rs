//! Cancelable save timer.

use std::time::{Duration, Instant};

/// A one-shot deadline that every edit pushes back.
///
/// The timer never sleeps by itself: the owner asks [`SaveTimer::fire`]
/// whether the deadline has passed, and a host event loop can wait on
/// [`SaveTimer::deadline`]. Time is always passed in, so the timer can be
/// driven by a real clock or a test clock alike.
#[derive(Debug, Clone, Default)]
pub struct SaveTimer {
    /// When the pending save fires.
    deadline: Option<Instant>,
}

impl SaveTimer {
    /// Create a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// When the pending save fires, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Arm the timer, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Drop the pending save without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Check whether the deadline has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return `true` if the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.cancel();
        true
    }
}
