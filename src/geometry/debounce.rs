//! Cancellable deferred task.
//!
//! Nothing runs on its own: the owner polls with the current time each frame
//! and receives the payload once the quiet period has elapsed. Each schedule
//! replaces the pending task, so a burst of triggers yields only the last
//! payload. Dropping the debouncer drops the pending task with it.

use std::time::{Duration, Instant};

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(u64);

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Pending<T> {
    handle: TaskHandle,
    deadline: Instant,
    payload: T,
}

pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    next_handle: u64,
    /// Triggers absorbed into a later one
    collapsed: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_handle: 0,
            collapsed: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `payload` to fire `delay` after `now`, cancelling any task
    /// that is still pending.
    pub fn schedule(&mut self, now: Instant, payload: T) -> TaskHandle {
        self.next_handle += 1;
        let handle = TaskHandle(self.next_handle);
        if let Some(old) = &self.pending {
            self.collapsed += 1;
            log::trace!("debounce: task {} replaces {}", handle, old.handle);
        }
        self.pending = Some(Pending {
            handle,
            deadline: now + self.delay,
            payload,
        });
        handle
    }

    /// Cancel whatever is pending. Returns the dropped task, if any.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        let cancelled = self.pending.take().map(|p| p.handle);
        if let Some(handle) = cancelled {
            log::trace!("debounce: cancelled task {}", handle);
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending task fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Take the payload if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|p| {
            log::trace!("debounce: task {} fired", p.handle);
            p.payload
        })
    }

    pub fn collapsed(&self) -> u64 {
        self.collapsed
    }
}
