//! Per-device results reported back to the scheduler.

use std::fmt;
use std::path::PathBuf;

use crate::model::{DeviceDescriptor, TrackKind};

#[derive(Debug)]
pub enum TrackStatus {
    Completed { path: PathBuf, bytes: u64 },
    Failed { error: String },
    /// Not attempted (no audio gateway, or cancelled first).
    Skipped,
}

impl TrackStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TrackStatus::Completed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TrackStatus::Failed { .. })
    }
}

#[derive(Debug)]
pub enum MuxStatus {
    /// Device has no audio track.
    NotNeeded,
    Combined { path: PathBuf },
    Failed { error: String },
    /// Audio is expected but a track failed, so there was nothing to combine.
    Skipped,
}

/// Everything one device pipeline produced.
#[derive(Debug)]
pub struct DeviceOutcome {
    pub device_id: String,
    pub display_name: String,
    pub video: TrackStatus,
    pub audio: TrackStatus,
    pub mux: MuxStatus,
}

impl DeviceOutcome {
    /// Outcome for a device whose pipeline never started.
    pub fn cancelled(device: &DeviceDescriptor) -> Self {
        Self {
            device_id: device.device_id.clone(),
            display_name: device.display_name.clone(),
            video: TrackStatus::Skipped,
            audio: TrackStatus::Skipped,
            mux: MuxStatus::Skipped,
        }
    }

    /// Outcome for a device whose worker panicked or could not be joined.
    pub fn crashed(device: &DeviceDescriptor, reason: impl Into<String>) -> Self {
        Self {
            device_id: device.device_id.clone(),
            display_name: device.display_name.clone(),
            video: TrackStatus::Failed {
                error: reason.into(),
            },
            audio: TrackStatus::Skipped,
            mux: MuxStatus::Skipped,
        }
    }

    pub fn track(&self, kind: TrackKind) -> &TrackStatus {
        match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
        }
    }

    /// True when every expected artifact was produced.
    pub fn is_success(&self) -> bool {
        if !self.video.is_completed() {
            return false;
        }
        match self.mux {
            MuxStatus::NotNeeded => true,
            MuxStatus::Combined { .. } => true,
            MuxStatus::Failed { .. } | MuxStatus::Skipped => false,
        }
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackStatus::Completed { path, bytes } => write!(f, "{} ({} bytes)", path.display(), bytes),
            TrackStatus::Failed { error } => write!(f, "failed: {}", error),
            TrackStatus::Skipped => f.write_str("skipped"),
        }
    }
}

impl fmt::Display for MuxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuxStatus::NotNeeded => f.write_str("not needed"),
            MuxStatus::Combined { path } => write!(f, "{}", path.display()),
            MuxStatus::Failed { error } => write!(f, "failed: {}", error),
            MuxStatus::Skipped => f.write_str("skipped"),
        }
    }
}
