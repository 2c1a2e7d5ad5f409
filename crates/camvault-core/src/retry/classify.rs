//! Map curl errors and HTTP statuses from the media endpoint to retry kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Fatal,
    }
}

/// Timeouts and dropped or truncated transfers are transient; anything
/// else (TLS, malformed URL, refused auth) is fatal.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    let transient = e.is_operation_timedout()
        || e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file();
    if transient {
        ErrorKind::Transient
    } else {
        ErrorKind::Fatal
    }
}

pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http { status, .. } => classify_http_status(*status),
    }
}
