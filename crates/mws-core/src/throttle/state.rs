//! Mutable throttle record for one operation.

use std::time::{Duration, Instant};

/// Length of the provider's quota window.
pub(crate) const QUOTA_WINDOW: Duration = Duration::from_secs(3600);

/// Throttle observations for one operation.
///
/// `attempt` is only changed by the backoff scheduler; the limiter reads
/// `last_send`/`last_units` and the quota window, and the controller records
/// sends and outcomes.
#[derive(Debug, Clone, Default)]
pub struct ThrottleState {
    /// Position in the backoff table, always within `[0, ceiling]`.
    pub attempt: usize,
    /// Duration of the most recent backoff sleep.
    pub backoff: Duration,
    pub last_send: Option<Instant>,
    /// Quota units the last send consumed; drives the next cool-down.
    pub last_units: u32,
    /// The last fault seen was retryable and has not been followed by a success.
    pub throttled: bool,
    /// The last call was aborted on a fatal or unknown fault.
    pub denied: bool,
    pub window_start: Option<Instant>,
    pub window_units: u64,
    pub throttled_events: u32,
    pub error_events: u32,
    pub success_events: u32,
}

impl ThrottleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-call flags; pacing and quota history carry over.
    pub fn begin_call(&mut self) {
        self.throttled = false;
        self.denied = false;
    }

    /// Record that a request costing `units` left at `now`.
    pub fn record_send(&mut self, now: Instant, units: u32) {
        let window_expired = self
            .window_start
            .map_or(true, |start| now.saturating_duration_since(start) >= QUOTA_WINDOW);
        if window_expired {
            self.window_start = Some(now);
            self.window_units = 0;
        }
        self.window_units = self.window_units.saturating_add(u64::from(units));
        self.last_send = Some(now);
        self.last_units = units;
    }

    pub fn record_success(&mut self) {
        self.throttled = false;
        self.success_events = self.success_events.saturating_add(1);
    }

    pub fn record_throttled(&mut self) {
        self.throttled = true;
        self.throttled_events = self.throttled_events.saturating_add(1);
    }

    pub fn record_denied(&mut self) {
        self.denied = true;
        self.throttled = false;
        self.error_events = self.error_events.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_send_opens_and_rolls_the_quota_window() {
        let t0 = Instant::now();
        let mut state = ThrottleState::new();
        state.record_send(t0, 18);
        state.record_send(t0 + Duration::from_secs(2), 9);
        assert_eq!(state.window_start, Some(t0));
        assert_eq!(state.window_units, 27);
        assert_eq!(state.last_units, 9);

        let later = t0 + QUOTA_WINDOW + Duration::from_secs(1);
        state.record_send(later, 5);
        assert_eq!(state.window_start, Some(later));
        assert_eq!(state.window_units, 5);
    }

    #[test]
    fn outcome_flags_and_counters() {
        let mut state = ThrottleState::new();
        state.record_throttled();
        assert!(state.throttled);
        state.record_success();
        assert!(!state.throttled);
        state.record_denied();
        assert!(state.denied);
        assert_eq!(
            (state.throttled_events, state.success_events, state.error_events),
            (1, 1, 1)
        );

        state.begin_call();
        assert!(!state.denied && !state.throttled);
        assert_eq!(state.error_events, 1);
    }

    #[test]
    fn recording_never_touches_attempt() {
        let mut state = ThrottleState::new();
        state.attempt = 2;
        state.record_send(Instant::now(), 3);
        state.record_throttled();
        state.record_success();
        state.record_denied();
        state.begin_call();
        assert_eq!(state.attempt, 2);
    }
}
