//! Per-operation throttle state and the rate limiter that reads it.
//!
//! Each operation owns one [`ThrottleState`]. A standalone call creates a fresh
//! one and drops it when done; the client keeps one per operation in a
//! [`ThrottleRegistry`] behind a lock so concurrent callers of the same
//! operation are serialized and pacing carries over between calls.

mod limiter;
mod registry;
mod state;

pub use limiter::RateLimiter;
pub use registry::ThrottleRegistry;
pub use state::ThrottleState;
