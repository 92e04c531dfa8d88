//! Process-local map of operation name to its shared throttle state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::ThrottleState;

/// One lock per operation. Holding an operation's lock is the only way to
/// mutate its state, so callers of the same operation are serialized while
/// different operations proceed independently.
#[derive(Debug, Default)]
pub struct ThrottleRegistry {
    entries: Mutex<HashMap<&'static str, Arc<Mutex<ThrottleState>>>>,
}

impl ThrottleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared state for `operation`, created on first use.
    pub fn state_for(&self, operation: &'static str) -> Arc<Mutex<ThrottleState>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(operation).or_default())
    }

    /// Copy of the current state, if the operation has been used.
    pub fn snapshot(&self, operation: &str) -> Option<ThrottleState> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.get(operation).map(|state| {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
