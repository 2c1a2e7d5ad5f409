//! Error taxonomy for footage retrieval.
//!
//! Every variant is fatal to the track (or API call) that raised it and to
//! nothing else; the pipeline coordinator and scheduler turn them into
//! per-device outcomes instead of propagating them further.

use crate::mux::MuxError;
use crate::retry::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum FootageError {
    /// Federated session token request was rejected.
    #[error("session token request failed with HTTP {status}: {body}")]
    Auth { status: u32, body: String },

    /// Control API call (media URIs, device lists) failed or returned an unexpected body.
    #[error("{endpoint} failed with HTTP {status}: {body}")]
    Api {
        endpoint: String,
        status: u32,
        body: String,
    },

    /// Manifest document is malformed or lacks a required field.
    #[error("manifest parse failed: {0}")]
    ManifestParse(String),

    /// URI template lacks a placeholder, or no template was offered for the requested network.
    #[error("URI template {template:?}: {reason}")]
    Template { template: String, reason: String },

    /// Manifest URI does not end in a recognized manifest file name.
    #[error("unrecognized manifest naming convention: {uri}")]
    SegmentNaming { uri: String },

    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("network: {0}")]
    Network(#[source] curl::Error),

    /// Media endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http {
        status: u32,
        url: String,
        body: String,
    },

    /// Local file I/O failed while writing a track.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),

    /// Requested time window cannot be split into whole segments.
    #[error("invalid time window: {0}")]
    InvalidWindow(String),

    /// Manifest advertises less footage than the requested window.
    #[error("manifest covers {advertised} segment(s) but {expected} were requested")]
    IncompleteDownload { expected: u64, advertised: u64 },

    /// External mux tool failed.
    #[error(transparent)]
    Mux(#[from] MuxError),

    /// Run was cancelled before this work finished.
    #[error("cancelled")]
    Cancelled,
}

impl From<FetchError> for FootageError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Curl(e) => FootageError::Network(e),
            FetchError::Http { status, url, body } => FootageError::Http { status, url, body },
        }
    }
}

impl FootageError {
    /// Raw response body, when the failure carried one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            FootageError::Auth { body, .. }
            | FootageError::Api { body, .. }
            | FootageError::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}
