//! CLI for camvault.

mod fetch;
mod report;

use anyhow::Result;
use camvault_core::config;
use clap::Parser;
use std::path::PathBuf;

/// Copy time-windowed footage from every selected camera to local storage.
#[derive(Debug, Parser)]
#[command(name = "camvault")]
#[command(about = "camvault: copy camera footage for a time window to local storage", long_about = None)]
pub struct Cli {
    /// API key for the control API.
    #[arg(short = 'a', long)]
    pub api_key: String,

    /// Client certificate for certificate auth (requires --private-key).
    #[arg(short = 'c', long, requires = "private_key")]
    pub cert: Option<PathBuf>,

    /// Private key matching --cert.
    #[arg(short = 'p', long, requires = "cert")]
    pub private_key: Option<PathBuf>,

    /// Window start in epoch seconds (default: one hour ago).
    #[arg(short = 's', long, value_name = "EPOCH_SECS", allow_negative_numbers = true)]
    pub start_time: Option<i64>,

    /// Window length in seconds; must be a positive multiple of 2.
    #[arg(short = 'u', long, default_value_t = 3600, value_name = "SECS")]
    pub duration: u64,

    /// Log raw requests and responses.
    #[arg(short = 'g', long)]
    pub debug: bool,

    /// Use the WAN manifest template instead of the LAN one.
    #[arg(short = 'w', long)]
    pub usewan: bool,

    /// Only cameras at this location.
    #[arg(long, visible_alias = "loc", value_name = "UUID")]
    pub location_uuid: Option<String>,

    /// Only this camera.
    #[arg(long, visible_alias = "cam", value_name = "UUID")]
    pub camera_uuid: Option<String>,

    /// Directory for downloaded footage (created if missing).
    #[arg(short = 'd', long, default_value = ".")]
    pub destination: PathBuf,

    /// Config file to use instead of ~/.config/camvault/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let summary = fetch::run_fetch(&self, &cfg).await?;
        report::print_summary(&summary);
        report::check(&summary)
    }
}

#[cfg(test)]
mod tests;
