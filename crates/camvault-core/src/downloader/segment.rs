//! Numbered segment fetches for one track.

use std::ops::Range;

use crate::error::FootageError;
use crate::http::HttpClient;
use crate::manifest::ManifestInfo;
use crate::retry::{run_with_retry, RetryPolicy, ThrottleGate};
use crate::url_model::segment_uri;

/// Address of one numbered media segment; `ordinal` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReference {
    pub uri: String,
    pub ordinal: u64,
}

/// Result of one segment fetch, tagged with its ordinal.
pub(super) type SegmentBody = (u64, Result<Vec<u8>, FootageError>);

/// Everything needed to address and fetch the segments of one track.
/// Borrowed from the track download; shared read-only by batch workers.
pub(super) struct SegmentFetcher<'a> {
    pub(super) http: &'a HttpClient,
    pub(super) manifest_uri: &'a str,
    pub(super) info: &'a ManifestInfo,
    pub(super) cookie: &'a str,
    pub(super) retry: &'a RetryPolicy,
    /// Held by whichever worker gets throttled; paces the whole track.
    pub(super) gate: &'a ThrottleGate,
}

impl SegmentFetcher<'_> {
    pub(super) fn reference(&self, ordinal: u64) -> Result<SegmentReference, FootageError> {
        let name = self.info.segment_name(ordinal);
        let uri = segment_uri(self.manifest_uri, &name).ok_or_else(|| FootageError::SegmentNaming {
            uri: self.manifest_uri.to_string(),
        })?;
        Ok(SegmentReference { uri, ordinal })
    }

    /// GET `uri` with retry on transient failures; returns the full body.
    pub(super) fn fetch_uri(&self, uri: &str) -> Result<Vec<u8>, FootageError> {
        let resp = run_with_retry(self.retry, self.gate, || {
            self.http.get_media(uri, self.cookie)?.error_for_status(uri)
        })?;
        Ok(resp.body)
    }

    pub(super) fn fetch(&self, ordinal: u64) -> Result<Vec<u8>, FootageError> {
        let seg = self.reference(ordinal)?;
        tracing::debug!(ordinal, uri = %seg.uri, "fetching segment");
        self.fetch_uri(&seg.uri)
    }

    /// Fetches `ordinals` concurrently (one worker thread each) and returns
    /// the results in ordinal order. At most `ordinals.len()` bodies are held
    /// in memory at once.
    pub(super) fn fetch_batch(&self, ordinals: Range<u64>) -> Vec<SegmentBody> {
        if ordinals.end.saturating_sub(ordinals.start) <= 1 {
            return ordinals.map(|o| (o, self.fetch(o))).collect();
        }

        std::thread::scope(|s| {
            let handles: Vec<_> = ordinals
                .map(|o| (o, s.spawn(move || self.fetch(o))))
                .collect();
            handles
                .into_iter()
                .map(|(o, h)| match h.join() {
                    Ok(res) => (o, res),
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::AuthScheme;

    fn info() -> ManifestInfo {
        ManifestInfo {
            init_segment_name: "seg_init.mp4".to_string(),
            segment_name_pattern: "seg_$Number$.m4v".to_string(),
            start_index: 10,
            presentation_duration_secs: None,
        }
    }

    #[test]
    fn reference_applies_start_index() {
        let http = HttpClient::new("k", AuthScheme::ApiToken);
        let info = info();
        let retry = RetryPolicy::default();
        let gate = ThrottleGate::new();
        let f = SegmentFetcher {
            http: &http,
            manifest_uri: "https://10.0.0.5/dash/1700000000/4/clip.mpd",
            info: &info,
            cookie: "RSESSIONID=RFT:t",
            retry: &retry,
            gate: &gate,
        };
        assert_eq!(
            f.reference(0).unwrap().uri,
            "https://10.0.0.5/dash/1700000000/4/seg_10.m4v"
        );
        let last = f.reference(1).unwrap();
        assert_eq!(last.uri, "https://10.0.0.5/dash/1700000000/4/seg_11.m4v");
        assert_eq!(last.ordinal, 1);
    }

    #[test]
    fn reference_unrecognized_manifest_fails() {
        let http = HttpClient::new("k", AuthScheme::ApiToken);
        let info = info();
        let retry = RetryPolicy::default();
        let gate = ThrottleGate::new();
        let f = SegmentFetcher {
            http: &http,
            manifest_uri: "https://10.0.0.5/dash/stream.m3u8",
            info: &info,
            cookie: "RSESSIONID=RFT:t",
            retry: &retry,
            gate: &gate,
        };
        assert!(matches!(f.reference(0), Err(FootageError::SegmentNaming { .. })));
    }
}
