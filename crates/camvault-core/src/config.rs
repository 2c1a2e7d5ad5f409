use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::downloader::TrackSettings;
use crate::retry::RetryPolicy;
use crate::scheduler::PoolSettings;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per segment (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl TryFrom<&RetryConfig> for RetryPolicy {
    type Error = anyhow::Error;

    fn try_from(c: &RetryConfig) -> Result<Self> {
        let base_delay = Duration::try_from_secs_f64(c.base_delay_secs)
            .with_context(|| format!("retry.base_delay_secs = {} is not a valid delay", c.base_delay_secs))?;
        Ok(RetryPolicy {
            max_attempts: c.max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(c.max_delay_secs),
        })
    }
}

/// Global configuration loaded from `~/.config/camvault/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CamvaultConfig {
    /// Control API base URL.
    pub api_base_url: String,
    /// Device pipelines running at once.
    pub max_concurrent_devices: usize,
    /// Delay before each device pipeline starts, in milliseconds.
    pub pacing_ms: u64,
    /// Lifetime requested for each federated session token.
    pub session_ttl_secs: u64,
    /// Concurrent segment fetches per track (1 = sequential).
    pub segment_fanout: usize,
    /// Log a progress line every this many segments.
    pub progress_every_segments: u64,
    pub connect_timeout_secs: u64,
    /// Upper bound on one whole transfer (manifest or segment).
    pub request_timeout_secs: u64,
    /// ffmpeg executable used to combine video and audio.
    pub ffmpeg_path: PathBuf,
    /// Fetch only what the manifest advertises when it is shorter than requested.
    pub allow_short_manifest: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for CamvaultConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api2.rhombussystems.com".to_string(),
            max_concurrent_devices: 4,
            pacing_ms: 100,
            session_ttl_secs: 3600,
            segment_fanout: 4,
            progress_every_segments: 300,
            connect_timeout_secs: 15,
            request_timeout_secs: 120,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            allow_short_manifest: false,
            retry: None,
        }
    }
}

impl CamvaultConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(r) => RetryPolicy::try_from(r),
            None => Ok(RetryPolicy::default()),
        }
    }

    pub fn track_settings(&self, use_wan: bool) -> Result<TrackSettings> {
        Ok(TrackSettings {
            session_ttl_secs: self.session_ttl_secs,
            use_wan,
            segment_fanout: self.segment_fanout.max(1),
            progress_every: self.progress_every_segments,
            retry: self.retry_policy()?,
            allow_short_manifest: self.allow_short_manifest,
        })
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_concurrent: self.max_concurrent_devices.max(1),
            pacing: Duration::from_millis(self.pacing_ms),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("camvault")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CamvaultConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CamvaultConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from(path: &Path) -> Result<CamvaultConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: CamvaultConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.retry_policy()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
