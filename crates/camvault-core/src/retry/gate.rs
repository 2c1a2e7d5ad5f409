//! Batch-wide pause after the camera signals throttling.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Shared by every worker of one track. When any worker is throttled it
/// holds the gate; every worker waits for it before its next request.
#[derive(Debug, Default)]
pub struct ThrottleGate {
    resume_at: Mutex<Option<Instant>>,
}

impl ThrottleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the gate closed until at least `at`. Never shortens an existing hold.
    pub fn hold_until(&self, at: Instant) {
        let mut resume_at = self.resume_at.lock().unwrap_or_else(|e| e.into_inner());
        if resume_at.map_or(true, |cur| at > cur) {
            *resume_at = Some(at);
        }
    }

    /// Time left before requests may resume, if the gate is held.
    pub fn remaining(&self) -> Option<Duration> {
        let resume_at = *self.resume_at.lock().unwrap_or_else(|e| e.into_inner());
        resume_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .filter(|d| !d.is_zero())
    }

    /// Block until the gate is open, including holds added while waiting.
    pub fn wait(&self) {
        while let Some(d) = self.remaining() {
            std::thread::sleep(d);
        }
    }
}
