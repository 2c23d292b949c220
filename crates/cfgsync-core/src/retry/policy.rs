use crate::config::RetryConfig;
use std::time::{Duration, TryFromFloatSecsError};

/// Retry-relevant classification of a failed export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out.
    Timeout,
    /// 429 / 503.
    Throttled,
    /// DNS, refused connection, reset, empty reply.
    Connection,
    /// Other 5xx.
    Http5xx(u16),
    /// Client errors, bad responses, anything else. Never retried.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff with a cap on both attempts and delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Fails when `base_delay_secs` is not representable as a `Duration`
/// (infinite or out of range).
impl TryFrom<&RetryConfig> for RetryPolicy {
    type Error = TryFromFloatSecsError;

    fn try_from(cfg: &RetryConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: Duration::try_from_secs_f64(cfg.base_delay_secs.max(0.0))?,
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        })
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based (1 = the request that just failed was the first).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => {
                // base * 2^(attempt-1), capped.
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}
