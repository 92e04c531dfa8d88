//! The one place the attempt counter moves.

use std::time::Duration;

use tracing::warn;

use crate::clock::Clock;
use crate::control::{CancelToken, Cancelled};
use crate::throttle::ThrottleState;

use super::BackoffSchedule;

/// Sleeps between retries of the same chunk.
#[derive(Debug, Clone, Copy)]
pub struct BackoffScheduler<'a> {
    schedule: &'a BackoffSchedule,
}

impl<'a> BackoffScheduler<'a> {
    pub fn new(schedule: &'a BackoffSchedule) -> Self {
        Self { schedule }
    }

    /// Delay for the state's current attempt.
    pub fn next_delay(&self, state: &ThrottleState) -> Duration {
        self.schedule.next_delay(state.attempt)
    }

    /// Wait out the current step, then advance `attempt` (wrapping past the ceiling).
    ///
    /// A cancelled wait leaves `attempt` where it was.
    pub fn sleep<C: Clock + ?Sized>(
        &self,
        state: &mut ThrottleState,
        clock: &C,
        cancel: &CancelToken,
    ) -> Result<Duration, Cancelled> {
        let delay = self.next_delay(state);
        state.backoff = delay;
        warn!(attempt = state.attempt, ?delay, "backing off");
        if !clock.sleep(delay, cancel) {
            return Err(Cancelled);
        }
        state.attempt = (state.attempt + 1) % self.schedule.len().max(1);
        Ok(delay)
    }
}
