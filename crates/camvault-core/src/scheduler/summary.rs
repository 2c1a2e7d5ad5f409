//! Aggregated result of one run.

use std::time::Duration;

use crate::pipeline::DeviceOutcome;

#[derive(Debug)]
pub struct RunSummary {
    /// One outcome per device, in completion order.
    pub outcomes: Vec<DeviceOutcome>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Outcomes sorted by device id, for stable reporting.
    pub fn sorted(&self) -> Vec<&DeviceOutcome> {
        let mut v: Vec<_> = self.outcomes.iter().collect();
        v.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        v
    }
}
