//! Throttled, retrying client core for Amazon MWS (Products and Reports).
//!
//! Batches are split to each operation's bulk limit, paced against a token
//! bucket, signed with Signature Version 2 and resent with backoff when the
//! service answers with a retryable fault.

pub mod config;
pub mod logging;

pub mod batcher;
pub mod client;
pub mod clock;
pub mod control;
pub mod error;
pub mod fault;
pub mod operation;
pub mod parsers;
pub mod request;
pub mod retry;
pub mod throttle;

pub use client::MwsClient;
pub use error::{MwsError, TerminalError};
pub use operation::Operation;
pub use retry::{submit_batch, ErrorClass, RetryPolicy};
