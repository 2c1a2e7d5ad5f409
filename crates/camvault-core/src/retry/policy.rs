//! Backoff for segment fetches against one camera.
//!
//! Segments of a batch hit the same device at once, so delays are jittered
//! (workers that failed together do not come back together) and throttling
//! backs off one step further than a plain transient failure.

use std::time::Duration;

use rand::Rng;

/// How a failed fetch should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, dropped connection or a 5xx other than 503.
    Transient,
    /// The device asked us to slow down (429, 503). Shared by the whole batch.
    Throttled,
    /// Not worth retrying (4xx, TLS, bad URL, ...).
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    /// Retry after the given (already jittered) delay.
    RetryAfter(Duration),
}

/// Exponential backoff with full caps. Built from the `[retry]` config
/// section, or `Default` when that section is absent.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound on any single delay, jitter included.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Upper bound of the delay after failed `attempt` (1-based).
    ///
    /// Transient: `base * 2^(attempt-1)`. Throttled: `base * 2^attempt`.
    /// Both capped at `max_delay`.
    pub fn ceiling(&self, attempt: u32, kind: ErrorKind) -> Option<Duration> {
        let steps = match kind {
            ErrorKind::Fatal => return None,
            ErrorKind::Transient => attempt.saturating_sub(1),
            ErrorKind::Throttled => attempt,
        };
        let factor = 1u32 << steps.min(16);
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }

    /// Decide whether to retry after failed `attempt`; the delay is drawn
    /// uniformly from `[ceiling / 2, ceiling]`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match self.ceiling(attempt, kind) {
            Some(ceiling) => RetryDecision::RetryAfter(jitter(ceiling)),
            None => RetryDecision::NoRetry,
        }
    }
}

fn jitter(ceiling: Duration) -> Duration {
    let hi = ceiling.as_micros().min(u64::MAX as u128) as u64;
    if hi < 2 {
        return ceiling;
    }
    Duration::from_micros(rand::rng().random_range(hi / 2..=hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }

    fn delay(d: RetryDecision) -> Duration {
        match d {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected a retry"),
        }
    }

    #[test]
    fn fatal_is_never_retried() {
        assert_eq!(policy().decide(1, ErrorKind::Fatal), RetryDecision::NoRetry);
    }

    #[test]
    fn throttled_backs_off_one_step_further() {
        let p = policy();
        assert_eq!(p.ceiling(1, ErrorKind::Transient), Some(Duration::from_millis(100)));
        assert_eq!(p.ceiling(1, ErrorKind::Throttled), Some(Duration::from_millis(200)));
        assert_eq!(p.ceiling(3, ErrorKind::Transient), Some(Duration::from_millis(400)));
        assert_eq!(p.ceiling(3, ErrorKind::Throttled), Some(Duration::from_millis(800)));
    }

    #[test]
    fn delays_stay_within_half_ceiling_and_cap() {
        let p = policy();
        for attempt in 1..p.max_attempts {
            for kind in [ErrorKind::Transient, ErrorKind::Throttled] {
                let ceiling = p.ceiling(attempt, kind).unwrap();
                assert!(ceiling <= p.max_delay);
                for _ in 0..20 {
                    let d = delay(p.decide(attempt, kind));
                    assert!(d >= ceiling / 2 && d <= ceiling, "{:?} outside {:?}", d, ceiling);
                }
            }
        }
    }

    #[test]
    fn concurrent_failures_get_spread_out() {
        let p = policy();
        let delays: std::collections::HashSet<_> =
            (0..16).map(|_| delay(p.decide(4, ErrorKind::Throttled))).collect();
        assert!(delays.len() > 1, "all 16 workers would retry at the same instant");
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy {
            max_attempts: 3,
            ..policy()
        };
        assert!(matches!(p.decide(2, ErrorKind::Transient), RetryDecision::RetryAfter(_)));
        assert_eq!(p.decide(3, ErrorKind::Transient), RetryDecision::NoRetry);
        let single = RetryPolicy {
            max_attempts: 1,
            ..policy()
        };
        assert_eq!(single.decide(1, ErrorKind::Throttled), RetryDecision::NoRetry);
    }
}
