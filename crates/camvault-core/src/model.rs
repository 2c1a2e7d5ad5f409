//! Device and track identities shared by the directory, downloader and pipeline.

use std::fmt;

/// Which media stream of a clip is being downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One connected camera, with its associated audio gateway if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub device_id: String,
    pub display_name: String,
    pub audio_gateway_id: Option<String>,
}

impl DeviceDescriptor {
    pub fn new(device_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            display_name: display_name.into(),
            audio_gateway_id: None,
        }
    }

    pub fn with_audio_gateway(mut self, gateway_id: impl Into<String>) -> Self {
        self.audio_gateway_id = Some(gateway_id.into());
        self
    }

    pub fn has_audio(&self) -> bool {
        self.audio_gateway_id.is_some()
    }
}
