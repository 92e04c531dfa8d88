//! Retry controller: send each chunk, classify faults, back off and resend.
//!
//! Per chunk the controller moves through
//! `Idle -> Sending -> (Succeeded | Classifying)`, and from `Classifying` to
//! either `Waiting -> Sending` (retryable) or `Aborted`. Execution within a
//! call is strictly sequential; the limiter's admission wait and the backoff
//! sleep are its only suspension points.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::batcher;
use crate::clock::{Clock, SystemClock};
use crate::control::CancelToken;
use crate::error::{MwsError, TerminalError};
use crate::operation::Operation;
use crate::parsers::Decode;
use crate::request::{chunk_params, Fetch};
use crate::throttle::{RateLimiter, ThrottleState};

use super::{classify, BackoffScheduler, RetryDecision, RetryPolicy};

/// What a call did besides producing records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSummary {
    /// Chunks that completed successfully.
    pub chunks_sent: usize,
    /// Requests issued, resends included.
    pub requests: u32,
    /// Resends after a retryable fault.
    pub retries: u32,
    /// Retryable faults seen.
    pub throttle_events: u32,
    /// Time spent waiting for the rate limiter.
    pub paced: Duration,
    /// Time spent in backoff sleeps.
    pub backoff: Duration,
}

/// Records in input order plus the call summary.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<R> {
    pub records: Vec<R>,
    pub summary: CallSummary,
}

/// Drives one call for one operation.
pub struct RetryController<'a, F: ?Sized, C: ?Sized> {
    op: &'a Operation,
    policy: &'a RetryPolicy,
    fetch: &'a F,
    clock: &'a C,
    cancel: &'a CancelToken,
}

/// Per-call bookkeeping shared across chunks.
struct CallContext<'p> {
    started: Instant,
    base_params: &'p [(String, String)],
    summary: CallSummary,
}

impl<'a, F, C> RetryController<'a, F, C>
where
    F: Fetch + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        op: &'a Operation,
        policy: &'a RetryPolicy,
        fetch: &'a F,
        clock: &'a C,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            op,
            policy,
            fetch,
            clock,
            cancel,
        }
    }

    /// Send `items` in chunks of at most the operation's batch size.
    ///
    /// `base_params` go out with every chunk. Records come back in input
    /// order. The first non-retryable failure ends the call; chunks after it
    /// are never sent.
    pub fn run<T, D>(
        &self,
        state: &mut ThrottleState,
        items: &[T],
        base_params: &[(String, String)],
        decoder: &D,
    ) -> Result<BatchOutcome<D::Record>, MwsError>
    where
        T: AsRef<str>,
        D: Decode + ?Sized,
    {
        self.op.validate()?;
        let chunks = batcher::split(items, self.op.max_batch)?;
        let total = chunks.len();
        let mut ctx = self.begin(state, base_params);
        let mut records = Vec::new();

        for chunk in chunks {
            let params = chunk_params(self.op, chunk.items());
            records.extend(self.send_chunk(state, &mut ctx, chunk.index, chunk.len(), &params, decoder)?);
            ctx.summary.chunks_sent += 1;
        }

        self.finish(&ctx, total, records.len());
        Ok(BatchOutcome {
            records,
            summary: ctx.summary,
        })
    }

    /// One unbatched request carrying only `params`, under the same pacing and retry rules.
    pub fn run_single<D>(
        &self,
        state: &mut ThrottleState,
        params: &[(String, String)],
        decoder: &D,
    ) -> Result<BatchOutcome<D::Record>, MwsError>
    where
        D: Decode + ?Sized,
    {
        self.op.validate()?;
        let mut ctx = self.begin(state, params);
        let records = self.send_chunk(state, &mut ctx, 0, 1, &[], decoder)?;
        ctx.summary.chunks_sent = 1;
        self.finish(&ctx, 1, records.len());
        Ok(BatchOutcome {
            records,
            summary: ctx.summary,
        })
    }

    fn begin<'p>(&self, state: &mut ThrottleState, base_params: &'p [(String, String)]) -> CallContext<'p> {
        state.begin_call();
        CallContext {
            started: self.clock.now(),
            base_params,
            summary: CallSummary::default(),
        }
    }

    fn finish(&self, ctx: &CallContext<'_>, chunks: usize, records: usize) {
        let s = &ctx.summary;
        info!(
            operation = self.op.name,
            chunks,
            records,
            requests = s.requests,
            retries = s.retries,
            paced = ?s.paced,
            backoff = ?s.backoff,
            "call succeeded"
        );
    }

    fn cancelled(&self, chunk: usize) -> MwsError {
        warn!(operation = self.op.name, chunk, "call cancelled");
        TerminalError::Cancelled {
            operation: self.op.name,
            chunk,
        }
        .into()
    }

    /// Send one chunk until it succeeds or the call must end.
    fn send_chunk<D>(
        &self,
        state: &mut ThrottleState,
        ctx: &mut CallContext<'_>,
        index: usize,
        item_count: usize,
        chunk_params: &[(String, String)],
        decoder: &D,
    ) -> Result<Vec<D::Record>, MwsError>
    where
        D: Decode + ?Sized,
    {
        let op = self.op;
        let units = op.units_for(item_count);
        let limiter = RateLimiter::new(op);
        let scheduler = BackoffScheduler::new(&self.policy.schedule);

        let mut params = ctx.base_params.to_vec();
        params.extend_from_slice(chunk_params);

        loop {
            // Idle
            if self.cancel.is_cancelled() {
                return Err(self.cancelled(index));
            }
            let waited = limiter
                .admit(state, units, self.clock, self.cancel)
                .map_err(|_| self.cancelled(index))?;
            ctx.summary.paced += waited;

            // Sending
            state.record_send(self.clock.now(), units);
            ctx.summary.requests += 1;
            debug!(operation = op.name, chunk = index, items = item_count, units, "sending chunk");
            let payload = self.fetch.fetch(op, &params)?;

            if !decoder.is_fault(&payload) {
                let records = decoder.decode_result(&payload)?;
                state.record_success();
                debug!(operation = op.name, chunk = index, records = records.len(), "chunk succeeded");
                return Ok(records);
            }

            // Classifying
            let fault = decoder.decode_fault(&payload)?;
            let class = classify(&fault);
            let elapsed = self.clock.now().saturating_duration_since(ctx.started);
            match self
                .policy
                .decide(class, state.attempt, ctx.summary.retries, elapsed)
            {
                RetryDecision::Abort => {
                    state.record_denied();
                    warn!(operation = op.name, chunk = index, %class, %fault, "aborting call");
                    return Err(TerminalError::Fault {
                        operation: op.name,
                        chunk: index,
                        class,
                        fault,
                    }
                    .into());
                }
                RetryDecision::Exhausted => {
                    state.record_throttled();
                    ctx.summary.throttle_events += 1;
                    warn!(
                        operation = op.name,
                        chunk = index,
                        retries = ctx.summary.retries,
                        ?elapsed,
                        %fault,
                        "retries exhausted"
                    );
                    return Err(TerminalError::RetriesExhausted {
                        operation: op.name,
                        chunk: index,
                        retries: ctx.summary.retries,
                        elapsed,
                        last_fault: fault,
                    }
                    .into());
                }
                RetryDecision::Backoff(_) => {
                    state.record_throttled();
                    ctx.summary.throttle_events += 1;
                    warn!(operation = op.name, chunk = index, %fault, "throttled, will resend chunk");
                    // Waiting
                    let slept = scheduler
                        .sleep(state, self.clock, self.cancel)
                        .map_err(|_| self.cancelled(index))?;
                    ctx.summary.backoff += slept;
                    ctx.summary.retries += 1;
                }
            }
        }
    }
}

/// Send `items` for `op` with a throttle state that lives only for this call.
///
/// Uses the wall clock and the default retry policy. Long-lived callers that
/// issue many calls should go through [`crate::client::MwsClient`], which keeps
/// state per operation between calls.
pub fn submit_batch<T, F, D>(
    op: &Operation,
    items: &[T],
    base_params: &[(String, String)],
    fetch: &F,
    decoder: &D,
) -> Result<Vec<D::Record>, MwsError>
where
    T: AsRef<str>,
    F: Fetch + ?Sized,
    D: Decode + ?Sized,
{
    let policy = RetryPolicy::default();
    let cancel = CancelToken::new();
    let mut state = ThrottleState::new();
    RetryController::new(op, &policy, fetch, &SystemClock, &cancel)
        .run(&mut state, items, base_params, decoder)
        .map(|outcome| outcome.records)
}
