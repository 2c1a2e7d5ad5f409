//! Progress accounting for one track download.
//!
//! Every `every` segments the downloader reports the wall-clock range just
//! covered (300 segments = 10 minutes of footage by default).

use std::time::Instant;

use crate::window::TimeWindow;

#[derive(Debug)]
pub struct TrackProgress {
    window: TimeWindow,
    /// Segments this track will actually fetch (may be fewer than the window holds).
    planned: u64,
    every: u64,
    segments_done: u64,
    bytes_done: u64,
    started: Instant,
}

impl TrackProgress {
    pub fn new(window: TimeWindow, planned: u64, every: u64) -> Self {
        Self {
            window,
            planned,
            every,
            segments_done: 0,
            bytes_done: 0,
            started: Instant::now(),
        }
    }

    /// Records an appended segment. Returns the footage range `(from, to)`
    /// in epoch seconds when `ordinal` completes another reporting interval.
    pub fn record(&mut self, ordinal: u64, bytes: usize) -> Option<(i64, i64)> {
        self.segments_done += 1;
        self.bytes_done += bytes as u64;
        if self.every == 0 || ordinal == 0 || ordinal % self.every != 0 {
            return None;
        }
        Some((
            self.window.segment_start(ordinal - self.every),
            self.window.segment_start(ordinal),
        ))
    }

    pub fn segments_done(&self) -> u64 {
        self.segments_done
    }

    pub fn bytes_done(&self) -> u64 {
        self.bytes_done
    }

    /// Download rate in bytes per second (0 if no time has elapsed).
    pub fn bytes_per_sec(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / elapsed
    }

    /// Fraction of the planned segments appended, in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        let total = self.planned;
        if total == 0 {
            return 1.0;
        }
        (self.segments_done as f64 / total as f64).min(1.0)
    }
}
