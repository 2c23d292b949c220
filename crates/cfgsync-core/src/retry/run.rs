use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::service::ServiceError;

/// Runs `f` until it succeeds or the policy says stop. Sleeps the current
/// thread between attempts; call from blocking context only.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, ServiceError>
where
    F: FnMut() -> Result<T, ServiceError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            attempt,
                            ?kind,
                            delay_ms = d.as_millis() as u64,
                            "export request failed, retrying: {}",
                            e
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
