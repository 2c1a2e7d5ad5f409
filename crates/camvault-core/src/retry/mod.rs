//! Retry and backoff for media fetches.
//!
//! Failures are classified as transient, throttled or fatal. Transient
//! failures back off per worker with jitter; throttling holds a
//! [`ThrottleGate`] shared by every worker of the track so the camera sees
//! the whole batch slow down, not just one request.

mod classify;
mod error;
mod gate;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use gate::ThrottleGate;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
