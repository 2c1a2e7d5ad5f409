//! Human-readable run summary on stdout.

use anyhow::{bail, Result};
use camvault_core::pipeline::{DeviceOutcome, MuxStatus};
use camvault_core::scheduler::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    for outcome in summary.sorted() {
        println!("{}", device_line(outcome));
    }
    println!(
        "{} device(s) ok, {} failed. Total time elapsed: {:.2} seconds",
        summary.succeeded(),
        summary.failed(),
        summary.elapsed.as_secs_f64()
    );
}

pub(super) fn device_line(o: &DeviceOutcome) -> String {
    let status = if o.is_success() { "ok" } else { "FAILED" };
    let mut line = format!("[{}] {} ({}): video {}", status, o.display_name, o.device_id, o.video);
    if !matches!(o.mux, MuxStatus::NotNeeded) {
        line.push_str(&format!("; audio {}; mux {}", o.audio, o.mux));
    }
    line
}

/// Err when any device failed, so the process exits non-zero.
pub fn check(summary: &RunSummary) -> Result<()> {
    if summary.failed() > 0 {
        bail!(
            "{} of {} device(s) failed",
            summary.failed(),
            summary.outcomes.len()
        );
    }
    Ok(())
}
