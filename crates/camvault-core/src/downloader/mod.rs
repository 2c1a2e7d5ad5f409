//! Track downloader.
//!
//! Downloads one track (video or audio) of one device: acquires a session
//! token, resolves the time-windowed manifest URI, parses the manifest, then
//! appends the init segment followed by every numbered segment to a
//! `TrackOutput` in strict ordinal order.
//!
//! Segments are fetched in batches of `segment_fanout` concurrent requests
//! and appended in ordinal order, so memory stays bounded by one batch and
//! the output never depends on completion order. Each fetch is retried with
//! jittered backoff on timeouts, connection errors and 5xx responses; a
//! 429/503 pauses every worker of the track.

mod progress;
mod segment;

pub use progress::TrackProgress;
pub use segment::SegmentReference;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::api::{self, ApiClient, MediaSource};
use crate::control::CancelToken;
use crate::error::FootageError;
use crate::manifest::{self, ManifestInfo};
use crate::model::TrackKind;
use crate::retry::{RetryPolicy, ThrottleGate};
use crate::storage::TrackOutput;
use crate::url_model;
use crate::window::{format_epoch, TimeWindow};

use segment::SegmentFetcher;

/// Per-track behavior, derived from config.
#[derive(Debug, Clone)]
pub struct TrackSettings {
    /// Lifetime requested for each federated session token.
    pub session_ttl_secs: u64,
    /// Use the WAN manifest template instead of the first LAN one.
    pub use_wan: bool,
    /// Concurrent segment fetches per batch (1 = strictly one at a time).
    pub segment_fanout: usize,
    /// Emit a progress observation every this many segments (0 = never).
    pub progress_every: u64,
    pub retry: RetryPolicy,
    /// Accept manifests advertising less footage than requested.
    pub allow_short_manifest: bool,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: 3600,
            use_wan: false,
            segment_fanout: 4,
            progress_every: 300,
            retry: RetryPolicy::default(),
            allow_short_manifest: false,
        }
    }
}

/// One track of one device to download.
#[derive(Debug, Clone)]
pub struct TrackRequest<'a> {
    pub device_id: &'a str,
    pub kind: TrackKind,
    /// Camera id for video, audio gateway id for audio.
    pub source_id: &'a str,
    pub window: TimeWindow,
    pub output_path: &'a Path,
}

impl TrackRequest<'_> {
    fn source(&self) -> MediaSource<'_> {
        match self.kind {
            TrackKind::Video => MediaSource::Camera(self.source_id),
            TrackKind::Audio => MediaSource::AudioGateway(self.source_id),
        }
    }
}

/// Summary of a finished track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReport {
    pub kind: TrackKind,
    pub path: PathBuf,
    /// Numbered segments appended (excluding the init segment).
    pub segments: u64,
    pub bytes: u64,
}

/// Downloads one track into `req.output_path`.
///
/// Any error aborts this track only. When the failure happens after the
/// output was opened, the partial `.part` file is left on disk.
pub fn download_track(
    api: &ApiClient,
    settings: &TrackSettings,
    req: &TrackRequest<'_>,
    cancel: &CancelToken,
) -> Result<TrackReport, FootageError> {
    if cancel.is_cancelled() {
        return Err(FootageError::Cancelled);
    }
    let span = tracing::info_span!("track", device = %req.device_id, track = %req.kind);
    let _enter = span.enter();

    let token = api::acquire(api, settings.session_ttl_secs)?;
    let uris = api::fetch_media_uris(api, req.source())?;
    let template = uris.vod_template(settings.use_wan)?;
    debug!(template, "raw manifest URI template");

    let manifest_uri = url_model::resolve(template, &req.window)?;
    let cookie = token.cookie();

    let resp = api
        .http()
        .get_media(&manifest_uri, &cookie)?
        .error_for_status(&manifest_uri)?;
    let body = resp.text();
    debug!(uri = %manifest_uri, manifest = %body, "manifest document");
    let info = manifest::parse_for_track(&body, req.kind)?;

    let init_uri = url_model::segment_uri(&manifest_uri, &info.init_segment_name).ok_or_else(|| {
        FootageError::SegmentNaming {
            uri: manifest_uri.clone(),
        }
    })?;
    let segment_count = planned_segments(&req.window, &info, settings.allow_short_manifest)?;

    let gate = ThrottleGate::new();
    let fetcher = SegmentFetcher {
        http: api.http(),
        manifest_uri: &manifest_uri,
        info: &info,
        cookie: &cookie,
        retry: &settings.retry,
        gate: &gate,
    };

    let mut output = TrackOutput::create(req.output_path)?;
    debug!(path = %output.temp_path().display(), "writing track");

    debug!(uri = %init_uri, "fetching init segment");
    let init = fetcher.fetch_uri(&init_uri)?;
    output.append(&init)?;

    let mut progress = TrackProgress::new(req.window, segment_count, settings.progress_every);
    let fanout = settings.segment_fanout.max(1) as u64;
    let mut next = 0u64;
    while next < segment_count {
        if cancel.is_cancelled() {
            warn!(
                written = progress.segments_done(),
                "cancelled; partial output left at {}",
                output.temp_path().display()
            );
            return Err(FootageError::Cancelled);
        }
        if token.is_expired() {
            warn!("session token outlived its {}s lifetime", token.ttl().as_secs());
        }

        let end = (next + fanout).min(segment_count);
        for (ordinal, res) in fetcher.fetch_batch(next..end) {
            let bytes = res?;
            output.append(&bytes)?;
            if let Some((from, to)) = progress.record(ordinal, bytes.len()) {
                info!(
                    percent = (progress.fraction() * 100.0).round() as u64,
                    rate_kib_s = (progress.bytes_per_sec() / 1024.0).round() as u64,
                    "Segments written from [{}] - [{}]",
                    format_epoch(from),
                    format_epoch(to)
                );
            }
        }
        next = end;
    }

    let bytes = output.bytes_written();
    let path = output.finish()?;
    info!(
        segments = segment_count,
        bytes,
        "Successfully downloaded {} for {} from [{}] - [{}] to {}",
        req.kind,
        req.device_id,
        format_epoch(req.window.start()),
        format_epoch(req.window.end()),
        path.display()
    );

    Ok(TrackReport {
        kind: req.kind,
        path,
        segments: segment_count,
        bytes,
    })
}

/// Segments to fetch for `window`, checked against what the manifest advertises.
fn planned_segments(
    window: &TimeWindow,
    info: &ManifestInfo,
    allow_short: bool,
) -> Result<u64, FootageError> {
    let expected = window.segment_count();
    match info.advertised_segments() {
        Some(advertised) if advertised < expected => {
            if allow_short {
                warn!(expected, advertised, "manifest is shorter than the requested window");
                Ok(advertised)
            } else {
                Err(FootageError::IncompleteDownload { expected, advertised })
            }
        }
        _ => Ok(expected),
    }
}
