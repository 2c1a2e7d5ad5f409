use super::fetch::{auth_scheme, filter, window};
use super::report::{check, device_line};
use super::Cli;
use camvault_core::http::AuthScheme;
use camvault_core::model::DeviceDescriptor;
use camvault_core::pipeline::{DeviceOutcome, MuxStatus, TrackStatus};
use camvault_core::scheduler::RunSummary;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_defaults() {
    let cli = parse(&["camvault", "-a", "key"]);
    assert_eq!(cli.api_key, "key");
    assert_eq!(cli.duration, 3600);
    assert_eq!(cli.destination, PathBuf::from("."));
    assert!(cli.start_time.is_none());
    assert!(!cli.debug);
    assert!(!cli.usewan);
    assert!(cli.config.is_none());
    assert!(matches!(auth_scheme(&cli), AuthScheme::ApiToken));
}

#[test]
fn cli_requires_api_key() {
    assert!(Cli::try_parse_from(["camvault"]).is_err());
}

#[test]
fn cli_short_flags() {
    let cli = parse(&[
        "camvault", "-a", "key", "-s", "1700000000", "-u", "60", "-g", "-w", "-d", "/tmp/out",
    ]);
    assert_eq!(cli.start_time, Some(1_700_000_000));
    assert_eq!(cli.duration, 60);
    assert!(cli.debug);
    assert!(cli.usewan);
    assert_eq!(cli.destination, PathBuf::from("/tmp/out"));
}

#[test]
fn cli_cert_and_key_require_each_other() {
    assert!(Cli::try_parse_from(["camvault", "-a", "k", "-c", "api.crt"]).is_err());
    assert!(Cli::try_parse_from(["camvault", "-a", "k", "-p", "api.key"]).is_err());
    let cli = parse(&["camvault", "-a", "k", "-c", "api.crt", "-p", "api.key"]);
    assert_eq!(
        auth_scheme(&cli),
        AuthScheme::Certificate {
            cert: PathBuf::from("api.crt"),
            private_key: PathBuf::from("api.key"),
        }
    );
}

#[test]
fn cli_filter_aliases() {
    let cli = parse(&["camvault", "-a", "k", "--loc", "loc-1", "--cam", "cam-1"]);
    let f = filter(&cli);
    assert_eq!(f.location_id.as_deref(), Some("loc-1"));
    assert_eq!(f.device_id.as_deref(), Some("cam-1"));

    let long = parse(&["camvault", "-a", "k", "--location-uuid", "loc-2", "--camera-uuid", "cam-2"]);
    assert_eq!(long.location_uuid.as_deref(), Some("loc-2"));
    assert_eq!(long.camera_uuid.as_deref(), Some("cam-2"));
}

#[test]
fn window_defaults_to_last_hour() {
    let cli = parse(&["camvault", "-a", "k"]);
    let w = window(&cli, 1_700_003_600).unwrap();
    assert_eq!(w.start(), 1_700_000_000);
    assert_eq!(w.segment_count(), 1800);
}

#[test]
fn window_rejects_odd_duration() {
    let cli = parse(&["camvault", "-a", "k", "-u", "7"]);
    assert!(window(&cli, 1_700_000_000).is_err());
}

#[test]
fn failed_device_fails_the_run() {
    let device = DeviceDescriptor::new("cam-1", "Front");
    let ok = DeviceOutcome {
        video: TrackStatus::Completed {
            path: PathBuf::from("Front_cam-1_0_video.mp4"),
            bytes: 42,
        },
        mux: MuxStatus::NotNeeded,
        ..DeviceOutcome::cancelled(&device)
    };
    assert!(device_line(&ok).starts_with("[ok] Front (cam-1): video"));

    let passing = RunSummary {
        outcomes: vec![ok],
        elapsed: Duration::from_secs(1),
    };
    assert!(check(&passing).is_ok());

    let failing = RunSummary {
        outcomes: vec![DeviceOutcome::crashed(&device, "boom")],
        elapsed: Duration::from_secs(1),
    };
    let err = check(&failing).unwrap_err();
    assert!(err.to_string().contains("1 of 1"));
}
