//! Combine a finished video track and audio track into one container.
//!
//! The default muxer shells out to ffmpeg and copies both streams without
//! re-encoding. The pipeline only sees the `Muxer` trait so tests can stand in
//! a fake.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    #[error("failed to start mux tool {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mux tool exited with {}: {stderr}", exit_label(.status))]
    Failed { status: Option<i32>, stderr: String },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Capability to combine a video and an audio file into `output`.
pub trait Muxer: Send + Sync {
    fn combine(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError>;
}

/// Runs `ffmpeg -i video -i audio -c copy output`.
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    program: PathBuf,
}

impl FfmpegMuxer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, video: &Path, audio: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(["-map", "0:v:0", "-map", "1:a:0", "-c", "copy"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Muxer for FfmpegMuxer {
    fn combine(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError> {
        let mut cmd = self.command(video, audio, output);
        debug!(command = ?cmd, "running mux");
        let out = cmd.output().map_err(|source| MuxError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if out.status.success() {
            Ok(())
        } else {
            Err(MuxError::Failed {
                status: out.status.code(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            })
        }
    }
}
