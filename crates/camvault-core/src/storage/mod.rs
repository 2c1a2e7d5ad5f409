//! Track output files.
//!
//! Each track is appended to `<final>.part` and atomically renamed to its
//! final name once every segment is written. A failed track leaves its
//! `.part` file in place for recovery.

mod writer;

pub use writer::TrackOutput;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `cam_video.mp4` → `cam_video.mp4.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
