//! Manifest URI modeling and output filename derivation.
//!
//! - Fills the time window into a media URI template.
//! - Rewrites a manifest URI into a segment URI by swapping the file name.
//! - Derives deterministic output file names per device and track.

mod naming;
mod segment;
mod template;

pub use naming::{alnum_only, OutputNames};
pub use segment::{segment_uri, MANIFEST_FILE_NAMES};
pub use template::{resolve, DURATION_PLACEHOLDER, START_TIME_PLACEHOLDER};
