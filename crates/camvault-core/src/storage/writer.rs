//! Append-only writer for one track.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Append-only sink bound to one destination path. Owned by a single track
/// download; the file is flushed and closed on every exit path (`finish`
/// or drop).
pub struct TrackOutput {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    bytes_written: u64,
}

impl TrackOutput {
    /// Create (or truncate) `<final_path>.part`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        tracing::debug!(path = %temp_path.display(), "opened track output");
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
            bytes_written: 0,
        })
    }

    /// Append one segment body. Segments must arrive in playback order.
    pub fn append(&mut self, data: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "track output already closed"))?;
        writer.write_all(data)?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Path of the `.part` file being written.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and atomically rename the `.part` file to the final path.
    pub fn finish(mut self) -> io::Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        std::fs::rename(&self.temp_path, &self.final_path)?;
        Ok(self.final_path.clone())
    }
}

impl Drop for TrackOutput {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                tracing::warn!(path = %self.temp_path.display(), "failed to flush track output: {}", e);
            }
        }
    }
}
