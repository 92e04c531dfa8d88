//! Admission pacing between chunks.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::clock::Clock;
use crate::control::{CancelToken, Cancelled};
use crate::operation::Operation;

use super::state::{ThrottleState, QUOTA_WINDOW};

/// Paces sends for one operation.
///
/// After a send of `n` units the next send waits until the provider has
/// restored them (`n / restore_rate`); time already spent since that send
/// counts toward the wait. When the hourly quota would be exceeded the limiter
/// waits for the window to roll over. It never touches `attempt`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter<'a> {
    op: &'a Operation,
}

impl<'a> RateLimiter<'a> {
    pub fn new(op: &'a Operation) -> Self {
        Self { op }
    }

    /// How long a send costing `units` must wait at `now`.
    pub fn delay(&self, state: &ThrottleState, units: u32, now: Instant) -> Duration {
        let cooldown = state.last_send.map_or(Duration::ZERO, |last| {
            self.op
                .restore_time(state.last_units)
                .saturating_sub(now.saturating_duration_since(last))
        });

        let quota = match state.window_start {
            Some(start)
                if state.window_units > 0
                    && state.window_units + u64::from(units) > u64::from(self.op.hourly_quota) =>
            {
                QUOTA_WINDOW.saturating_sub(now.saturating_duration_since(start))
            }
            _ => Duration::ZERO,
        };

        cooldown.max(quota)
    }

    /// Suspend until a send costing `units` is permitted. Returns the time waited.
    ///
    /// Time spent fetching counts toward the cool-down, so `N` equal chunks
    /// wait a total of `(N-1) * chunk / restore_rate` only when fetches take
    /// no time (as under [`ManualClock`](crate::clock::ManualClock)).
    pub fn admit<C: Clock + ?Sized>(
        &self,
        state: &ThrottleState,
        units: u32,
        clock: &C,
        cancel: &CancelToken,
    ) -> Result<Duration, Cancelled> {
        let wait = self.delay(state, units, clock.now());
        if wait.is_zero() {
            return Ok(wait);
        }
        debug!(operation = self.op.name, ?wait, units, "pacing before send");
        if clock.sleep(wait, cancel) {
            Ok(wait)
        } else {
            Err(Cancelled)
        }
    }
}
