//! Deterministic output file names per device.

use std::path::{Path, PathBuf};

use crate::model::{DeviceDescriptor, TrackKind};
use crate::window::TimeWindow;

/// Keeps only alphanumeric characters (case preserved), e.g. `"Front Door #2"` → `"FrontDoor2"`.
pub fn alnum_only(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Paths of every file a device pipeline may produce.
///
/// Track files use `.mp4` when the device has no audio and `.webm` when it
/// does; the muxed result is always `<stem>_videoWithAudio.mp4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub video: PathBuf,
    pub audio: Option<PathBuf>,
    pub combined: Option<PathBuf>,
}

impl OutputNames {
    pub fn new(destination: &Path, device: &DeviceDescriptor, window: &TimeWindow) -> Self {
        let stem = format!(
            "{}_{}_{}",
            alnum_only(&device.display_name),
            device.device_id,
            window.start()
        );
        let ext = if device.has_audio() { ".webm" } else { ".mp4" };
        let track = |kind: TrackKind| destination.join(format!("{}_{}{}", stem, kind, ext));

        if device.has_audio() {
            OutputNames {
                video: track(TrackKind::Video),
                audio: Some(track(TrackKind::Audio)),
                combined: Some(destination.join(format!("{}_videoWithAudio.mp4", stem))),
            }
        } else {
            OutputNames {
                video: track(TrackKind::Video),
                audio: None,
                combined: None,
            }
        }
    }
}
