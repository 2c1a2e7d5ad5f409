//! Fetch error type for retry classification.

/// Error returned by a single HTTP fetch (curl failure or non-2xx status).
/// Kept separate from `FootageError` so it can be classified before retrying.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http {
        status: u32,
        url: String,
        body: String,
    },
}
