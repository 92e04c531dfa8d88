use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::MwsError;

use super::ErrorClass;

/// Fixed escalation table indexed by the attempt counter.
///
/// The ceiling is the last index; past it the counter wraps to 0 and the table
/// is applied again from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule {
    steps: Vec<Duration>,
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self {
            steps: [1, 4, 10, 30].into_iter().map(Duration::from_secs).collect(),
        }
    }
}

impl BackoffSchedule {
    /// Longest accepted step: one quota window.
    pub const MAX_STEP: Duration = Duration::from_secs(3600);

    pub fn new(steps: Vec<Duration>) -> Result<Self, MwsError> {
        if steps.is_empty() {
            return Err(MwsError::InvalidInput("backoff schedule is empty".into()));
        }
        if let Some(step) = steps.iter().find(|s| **s > Self::MAX_STEP) {
            return Err(MwsError::InvalidInput(format!(
                "backoff step {:?} exceeds {:?}",
                step,
                Self::MAX_STEP
            )));
        }
        Ok(Self { steps })
    }

    pub fn from_secs(secs: &[u64]) -> Result<Self, MwsError> {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    /// Delay for `attempt`; indices past the ceiling fall back to the first step.
    pub fn next_delay(&self, attempt: usize) -> Duration {
        self.steps
            .get(attempt)
            .or_else(|| self.steps.first())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Highest valid attempt index.
    pub fn ceiling(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Duration] {
        &self.steps
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Fatal or unknown fault: give up on the call.
    Abort,
    /// Retryable, but the call has used up its retries or time budget.
    Exhausted,
    /// Wait this long, then resend the same chunk.
    Backoff(Duration),
}

/// Backoff table plus per-call ceilings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub schedule: BackoffSchedule,
    /// Retries allowed per call (`None` = unbounded).
    pub max_retries: Option<u32>,
    /// Wall-clock budget per call, backoff waits included.
    pub max_elapsed: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            schedule: BackoffSchedule::default(),
            max_retries: Some(12),
            max_elapsed: None,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Result<Self, MwsError> {
        Ok(Self {
            schedule: BackoffSchedule::from_secs(&cfg.schedule_secs)?,
            max_retries: cfg.max_retries,
            max_elapsed: cfg.max_elapsed_secs.map(Duration::from_secs),
        })
    }

    /// Decide what to do after a fault of `class`.
    ///
    /// `attempt` is the scheduler position, `retries` the number of resends
    /// already made in this call and `elapsed` the time since the call began.
    pub fn decide(
        &self,
        class: ErrorClass,
        attempt: usize,
        retries: u32,
        elapsed: Duration,
    ) -> RetryDecision {
        if !class.is_retryable() {
            return RetryDecision::Abort;
        }
        if self.max_retries.is_some_and(|max| retries >= max) {
            return RetryDecision::Exhausted;
        }
        let delay = self.schedule.next_delay(attempt);
        if self
            .max_elapsed
            .is_some_and(|budget| elapsed.saturating_add(delay) > budget)
        {
            return RetryDecision::Exhausted;
        }
        RetryDecision::Backoff(delay)
    }
}
