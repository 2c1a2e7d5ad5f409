//! Device pipeline: video track, optional audio track, then mux.
//!
//! A failure of one track never prevents the other from running. The mux
//! only runs when both tracks completed; intermediates are removed only after
//! it succeeds.

mod outcome;

pub use outcome::{DeviceOutcome, MuxStatus, TrackStatus};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::control::CancelToken;
use crate::downloader::{download_track, TrackRequest, TrackSettings};
use crate::error::FootageError;
use crate::model::{DeviceDescriptor, TrackKind};
use crate::mux::Muxer;
use crate::url_model::OutputNames;
use crate::window::{format_epoch, TimeWindow};

/// Shared, read-only inputs for every device pipeline in a run.
#[derive(Clone)]
pub struct PipelineContext {
    pub api: ApiClient,
    pub settings: TrackSettings,
    pub destination: PathBuf,
    pub window: TimeWindow,
    pub muxer: Arc<dyn Muxer>,
    pub cancel: CancelToken,
}

/// Runs every track of `device` and returns what was produced.
pub fn run_device(ctx: &PipelineContext, device: &DeviceDescriptor) -> DeviceOutcome {
    if ctx.cancel.is_cancelled() {
        return DeviceOutcome::cancelled(device);
    }
    let span = tracing::info_span!("device", device = %device.device_id);
    let _enter = span.enter();

    if let Err(e) = std::fs::create_dir_all(&ctx.destination) {
        let err = FootageError::Storage(e);
        error!("cannot create destination {}: {}", ctx.destination.display(), err);
        return DeviceOutcome {
            video: TrackStatus::Failed {
                error: err.to_string(),
            },
            ..DeviceOutcome::cancelled(device)
        };
    }

    let names = OutputNames::new(&ctx.destination, device, &ctx.window);
    let video = run_track(ctx, device, TrackKind::Video, &device.device_id, &names.video);

    let (audio, mux) = match (&device.audio_gateway_id, &names.audio, &names.combined) {
        (Some(gateway), Some(audio_path), Some(combined)) => {
            let audio = run_track(ctx, device, TrackKind::Audio, gateway, audio_path);
            let mux = match (&video, &audio) {
                (TrackStatus::Completed { path: v, .. }, TrackStatus::Completed { path: a, .. }) => {
                    mux_tracks(ctx.muxer.as_ref(), v, a, combined)
                }
                _ => {
                    warn!("skipping mux; a track did not complete");
                    MuxStatus::Skipped
                }
            };
            (audio, mux)
        }
        _ => (TrackStatus::Skipped, MuxStatus::NotNeeded),
    };

    DeviceOutcome {
        device_id: device.device_id.clone(),
        display_name: device.display_name.clone(),
        video,
        audio,
        mux,
    }
}

fn run_track(
    ctx: &PipelineContext,
    device: &DeviceDescriptor,
    kind: TrackKind,
    source_id: &str,
    output_path: &Path,
) -> TrackStatus {
    let req = TrackRequest {
        device_id: &device.device_id,
        kind,
        source_id,
        window: ctx.window,
        output_path,
    };
    match download_track(&ctx.api, &ctx.settings, &req, &ctx.cancel) {
        Ok(report) => TrackStatus::Completed {
            path: report.path,
            bytes: report.bytes,
        },
        Err(e) => {
            error!(
                track = %kind,
                body = e.response_body().unwrap_or(""),
                "{} download failed for [{}] - [{}]: {}",
                kind,
                format_epoch(ctx.window.start()),
                format_epoch(ctx.window.end()),
                e
            );
            TrackStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}

fn mux_tracks(muxer: &dyn Muxer, video: &Path, audio: &Path, combined: &Path) -> MuxStatus {
    if let Err(e) = muxer.combine(video, audio, combined) {
        let err = FootageError::from(e);
        warn!("mux failed, keeping {} and {}: {}", video.display(), audio.display(), err);
        return MuxStatus::Failed {
            error: err.to_string(),
        };
    }
    info!("combined tracks into {}", combined.display());
    for path in [video, audio] {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("could not remove intermediate {}: {}", path.display(), e);
        }
    }
    MuxStatus::Combined {
        path: combined.to_path_buf(),
    }
}
