//! Device scheduler.
//!
//! Runs the device pipeline for every selected device under a concurrency
//! ceiling and collects a per-device summary.

mod pool;
mod summary;

pub use pool::{run_devices, PoolSettings};
pub use summary::RunSummary;
