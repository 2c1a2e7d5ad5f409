//! Select devices and run every device pipeline through the worker pool.

use anyhow::{Context, Result};
use camvault_core::api::{ApiClient, ApiDirectory, DeviceDirectory, DeviceFilter};
use camvault_core::config::CamvaultConfig;
use camvault_core::control::CancelToken;
use camvault_core::http::{AuthScheme, HttpClient};
use camvault_core::mux::FfmpegMuxer;
use camvault_core::pipeline::{run_device, PipelineContext};
use camvault_core::scheduler::{self, RunSummary};
use camvault_core::window::{format_epoch, TimeWindow};
use std::sync::Arc;
use std::time::Duration;

use super::Cli;

/// Default look-back when no start time is given.
const DEFAULT_LOOKBACK: Duration = Duration::from_secs(3600);

pub(super) fn auth_scheme(cli: &Cli) -> AuthScheme {
    match (&cli.cert, &cli.private_key) {
        (Some(cert), Some(key)) => AuthScheme::Certificate {
            cert: cert.clone(),
            private_key: key.clone(),
        },
        _ => AuthScheme::ApiToken,
    }
}

pub(super) fn window(cli: &Cli, now_epoch_secs: i64) -> Result<TimeWindow> {
    let start = cli
        .start_time
        .unwrap_or(now_epoch_secs - DEFAULT_LOOKBACK.as_secs() as i64);
    TimeWindow::new(start, cli.duration).context("invalid --start-time/--duration")
}

pub(super) fn filter(cli: &Cli) -> DeviceFilter {
    DeviceFilter {
        location_id: cli.location_uuid.clone(),
        device_id: cli.camera_uuid.clone(),
    }
}

pub async fn run_fetch(cli: &Cli, cfg: &CamvaultConfig) -> Result<RunSummary> {
    let window = window(cli, chrono::Utc::now().timestamp())?;
    let http = HttpClient::new(cli.api_key.clone(), auth_scheme(cli))
        .with_timeouts(cfg.connect_timeout(), cfg.request_timeout());
    let api = ApiClient::new(cfg.api_base_url.clone(), http);

    let lookup_api = api.clone();
    let device_filter = filter(cli);
    let devices = tokio::task::spawn_blocking(move || {
        ApiDirectory::new(&lookup_api).list_devices(&device_filter)
    })
    .await
    .context("device directory task")?
    .context("listing devices")?;

    if devices.is_empty() {
        tracing::warn!("no connected devices matched the filters");
    }
    tracing::info!(
        devices = devices.len(),
        "fetching footage from [{}] - [{}] into {}",
        format_epoch(window.start()),
        format_epoch(window.end()),
        cli.destination.display()
    );

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; no new devices will start");
            eprintln!("interrupted; finishing transfers in flight");
            on_interrupt.cancel();
        }
    });

    let ctx = Arc::new(PipelineContext {
        api,
        settings: cfg.track_settings(cli.usewan)?,
        destination: cli.destination.clone(),
        window,
        muxer: Arc::new(FfmpegMuxer::new(cfg.ffmpeg_path.clone())),
        cancel: cancel.clone(),
    });

    let summary = scheduler::run_devices(
        devices.into_values().collect(),
        cfg.pool_settings(),
        cancel,
        move |device| run_device(&ctx, &device),
    )
    .await;
    Ok(summary)
}
