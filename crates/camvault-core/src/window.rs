//! Requested footage window and segment arithmetic.

use chrono::{Local, TimeZone};

use crate::error::FootageError;

/// Fixed duration of one media segment, in seconds.
pub const SEGMENT_SECONDS: u64 = 2;

/// Start and length of the footage to retrieve.
///
/// Duration is positive and a whole number of segments; odd durations are
/// rejected rather than silently dropping the trailing second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    duration: u64,
}

impl TimeWindow {
    pub fn new(start_epoch_secs: i64, duration_secs: u64) -> Result<Self, FootageError> {
        if duration_secs == 0 {
            return Err(FootageError::InvalidWindow(
                "duration must be greater than zero".to_string(),
            ));
        }
        if duration_secs % SEGMENT_SECONDS != 0 {
            return Err(FootageError::InvalidWindow(format!(
                "duration {}s is not a multiple of the {}s segment length",
                duration_secs, SEGMENT_SECONDS
            )));
        }
        Ok(Self {
            start: start_epoch_secs,
            duration: duration_secs,
        })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.duration as i64)
    }

    /// Number of numbered media segments covering the window.
    pub fn segment_count(&self) -> u64 {
        self.duration / SEGMENT_SECONDS
    }

    /// Wall-clock start of the segment at `ordinal`.
    pub fn segment_start(&self, ordinal: u64) -> i64 {
        self.start
            .saturating_add((ordinal * SEGMENT_SECONDS) as i64)
    }
}

/// Render epoch seconds in the local time zone for log messages.
pub fn format_epoch(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(t) => t.format("%c").to_string(),
        None => secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_duration() {
        assert!(matches!(
            TimeWindow::new(1_700_000_000, 0),
            Err(FootageError::InvalidWindow(_))
        ));
    }

    #[test]
    fn rejects_odd_duration() {
        assert!(matches!(
            TimeWindow::new(1_700_000_000, 5),
            Err(FootageError::InvalidWindow(_))
        ));
    }

    #[test]
    fn segment_arithmetic() {
        let w = TimeWindow::new(1_700_000_000, 3600).unwrap();
        assert_eq!(w.segment_count(), 1800);
        assert_eq!(w.end(), 1_700_003_600);
        assert_eq!(w.segment_start(0), 1_700_000_000);
        assert_eq!(w.segment_start(300), 1_700_000_600);
    }

    #[test]
    fn format_epoch_is_not_empty() {
        assert!(!format_epoch(1_700_000_000).is_empty());
    }
}
