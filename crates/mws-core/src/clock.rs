//! Time source and the only suspension mechanism used by a call.
//!
//! The limiter and the backoff scheduler compute durations; they hand the
//! actual wait to a [`Clock`] so tests can run against [`ManualClock`] without
//! sleeping.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::control::CancelToken;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Wait for `duration` unless `cancel` fires. Returns false when cancelled.
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool;
}

/// Wall clock; waits block the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if duration.is_zero() {
            return !cancel.is_cancelled();
        }
        !cancel.wait_timeout(duration)
    }
}

#[derive(Debug, Default)]
struct ManualState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Virtual clock: `sleep` advances time instantly and records the duration.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    state: Mutex<ManualState>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(ManualState::default()),
        }
    }

    /// Move time forward without recording a sleep (e.g. simulated fetch latency).
    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        state.elapsed = self.advanced(state.elapsed, by);
    }

    /// Every completed sleep, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.lock().sleeps.iter().sum()
    }

    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    // Time stops at the last offset `origin` can represent.
    fn advanced(&self, elapsed: Duration, by: Duration) -> Duration {
        match elapsed.checked_add(by) {
            Some(next) if self.origin.checked_add(next).is_some() => next,
            _ => elapsed,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = self.lock().elapsed;
        self.origin.checked_add(elapsed).unwrap_or(self.origin)
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        let mut state = self.lock();
        state.elapsed = self.advanced(state.elapsed, duration);
        state.sleeps.push(duration);
        true
    }
}
