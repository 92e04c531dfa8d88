//! Fault classification, backoff and the retry controller.
//!
//! Only faults classified as retryable are handled here: the backoff scheduler
//! waits out the current step of the escalation table and the controller
//! resends the same chunk. Everything else ends the call.

mod backoff;
mod classify;
mod policy;
mod run;

pub use backoff::BackoffScheduler;
pub use classify::{classify, classify_code, ErrorClass};
pub use policy::{BackoffSchedule, RetryDecision, RetryPolicy};
pub use run::{submit_batch, BatchOutcome, CallSummary, RetryController};
