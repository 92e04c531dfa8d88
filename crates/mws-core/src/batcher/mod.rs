//! Chunk planning for batched operations.
//!
//! Splits a caller's item list into request-sized chunks that never exceed the
//! operation's maximum batch size. Chunks borrow from the input and are
//! produced lazily so the controller can send the first chunk before the rest
//! are planned.

mod chunk;

pub use chunk::{split, Chunk, Chunks};
