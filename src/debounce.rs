//! Cancel-and-reschedule timers driven by an injected clock.
//!
//! A `Debouncer` owns at most one pending `TimerHandle`. Scheduling replaces
//! the previous handle, which is how an earlier timer gets cancelled. Nothing
//! fires on its own: the owner calls `fire` with the current instant from its
//! event loop and acts on the returned handle.

use std::time::{Duration, Instant};

/// A scheduled, not yet fired action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub token: u64,
    pub deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    pending: Option<TimerHandle>,
    next_token: u64,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            next_token: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule the action `interval` after `now`, dropping any pending one.
    pub fn schedule(&mut self, now: Instant) -> TimerHandle {
        self.next_token += 1;
        let handle = TimerHandle {
            token: self.next_token,
            deadline: now + self.interval,
        };
        self.pending = Some(handle);
        handle
    }

    /// Drop the pending action. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|h| h.deadline)
    }

    /// Take the pending handle if its deadline has been reached.
    pub fn fire(&mut self, now: Instant) -> Option<TimerHandle> {
        match self.pending {
            Some(handle) if handle.deadline <= now => self.pending.take(),
            _ => None,
        }
    }
}
