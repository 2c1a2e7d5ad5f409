//! Retry loop: run a fetch until success or policy says stop.

use std::time::Instant;

use super::classify;
use super::error::FetchError;
use super::gate::ThrottleGate;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Runs a closure until it succeeds or the retry policy says to stop.
///
/// Every attempt first waits on `gate`. A throttled failure holds the gate
/// for its backoff so sibling workers pause too; a transient failure only
/// sleeps the calling thread.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, gate: &ThrottleGate, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        gate.wait();
        let e = match f() {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        let kind = classify::classify(&e);
        match policy.decide(attempt, kind) {
            RetryDecision::NoRetry => return Err(e),
            RetryDecision::RetryAfter(d) => {
                tracing::debug!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying fetch: {}", e);
                if kind == ErrorKind::Throttled {
                    gate.hold_until(Instant::now() + d);
                } else {
                    std::thread::sleep(d);
                }
                attempt += 1;
            }
        }
    }
}
