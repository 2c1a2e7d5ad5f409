//! Bounded device worker pool.
//!
//! Keeps up to `max_concurrent` device pipelines running at once; each
//! pipeline runs on the blocking thread pool since track downloads use
//! blocking transfers. A pacing delay precedes every start.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::control::CancelToken;
use crate::model::DeviceDescriptor;
use crate::pipeline::DeviceOutcome;

use super::summary::RunSummary;

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    /// Maximum device pipelines in flight (at least 1).
    pub max_concurrent: usize,
    /// Delay before each pipeline start.
    pub pacing: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            pacing: Duration::from_millis(100),
        }
    }
}

/// Runs `job` for every device under the pool limits and waits for all of them.
///
/// A failed or panicking pipeline only affects its own outcome: every device
/// gets exactly one outcome, and a task that cannot be joined is reported as
/// crashed. Devices not yet started when `cancel` fires are reported as cancelled.
pub async fn run_devices<F>(
    devices: Vec<DeviceDescriptor>,
    settings: PoolSettings,
    cancel: CancelToken,
    job: F,
) -> RunSummary
where
    F: Fn(DeviceDescriptor) -> DeviceOutcome + Send + Sync + 'static,
{
    let started = Instant::now();
    let max_concurrent = settings.max_concurrent.max(1);
    let job = Arc::new(job);
    let total = devices.len();
    let mut queue = devices.into_iter();
    let mut outcomes = Vec::with_capacity(total);
    let mut join_set = JoinSet::new();
    // Started but not yet reported; whatever is left after the loop crashed.
    let mut in_flight: Vec<DeviceDescriptor> = Vec::with_capacity(max_concurrent);

    info!(devices = total, max_concurrent, "starting device pool");

    loop {
        while join_set.len() < max_concurrent {
            let Some(device) = queue.next() else {
                break;
            };
            if cancel.is_cancelled() {
                outcomes.push(DeviceOutcome::cancelled(&device));
                continue;
            }
            if !settings.pacing.is_zero() {
                tokio::time::sleep(settings.pacing).await;
            }
            debug!(device = %device.device_id, "starting pipeline");
            let job = Arc::clone(&job);
            in_flight.push(device.clone());
            join_set.spawn_blocking(move || job(device));
        }

        if join_set.is_empty() {
            break;
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok(outcome) => {
                if outcome.is_success() {
                    info!(device = %outcome.device_id, "device finished");
                } else {
                    error!(device = %outcome.device_id, "device finished with failures");
                }
                in_flight.retain(|d| d.device_id != outcome.device_id);
                outcomes.push(outcome);
            }
            Err(e) => error!("device task join: {}", e),
        }
    }

    for device in in_flight {
        error!(device = %device.device_id, "device pipeline panicked or was aborted");
        outcomes.push(DeviceOutcome::crashed(&device, "device pipeline panicked or was aborted"));
    }

    let summary = RunSummary {
        outcomes,
        elapsed: started.elapsed(),
    };
    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "Total time elapsed: {:.2} seconds",
        summary.elapsed.as_secs_f64()
    );
    summary
}
