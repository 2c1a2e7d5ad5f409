//! Cooperative cancellation shared by the worker pool and track downloaders.
//!
//! The CLI sets the token on Ctrl-C. The scheduler stops starting new device
//! pipelines and every running track checks it between segment batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable abort flag; all clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Work already in a transfer finishes that transfer first.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
