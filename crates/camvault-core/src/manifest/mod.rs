//! Streaming manifest (DASH MPD) model.
//!
//! Only the segment naming scheme is needed: the initialization segment
//! name, the numbered media pattern and the first segment number. The
//! advertised presentation duration, when present, lets the downloader
//! detect manifests that cover less footage than was requested.

mod duration;
mod parse;

pub use duration::parse_iso8601_duration;
pub use parse::{parse, parse_for_track};

/// Placeholder for the segment number in a media pattern.
pub const NUMBER_PLACEHOLDER: &str = "$Number$";

/// Segment naming scheme extracted from one manifest document.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestInfo {
    pub init_segment_name: String,
    /// Media segment file name containing exactly one `$Number$`.
    pub segment_name_pattern: String,
    pub start_index: u64,
    /// `MPD@mediaPresentationDuration` in seconds, when advertised.
    pub presentation_duration_secs: Option<f64>,
}

impl ManifestInfo {
    /// File name of the media segment at zero-based `index`.
    pub fn segment_name(&self, index: u64) -> String {
        self.segment_name_pattern
            .replace(NUMBER_PLACEHOLDER, &(index + self.start_index).to_string())
    }

    /// Number of 2-second segments the advertised duration covers, if known.
    pub fn advertised_segments(&self) -> Option<u64> {
        self.presentation_duration_secs
            .map(|secs| (secs / crate::window::SEGMENT_SECONDS as f64).ceil() as u64)
    }
}
