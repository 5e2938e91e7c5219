use std::{future::Future, time::Duration};

use log::*;

/// Bounded retry policy for upstream API calls.
///
/// The default mirrors the behaviour the pipeline was built around: three attempts, no delay
/// between them, and every error considered retryable. Callers that want backoff or error
/// classification set `backoff` and pass their own predicate to [`run_with_retry`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, backoff: Duration::ZERO }
    }
}

/// Executes one async operation under the given retry policy.
///
/// `op` receives the 1-based attempt number. The first success is returned; once the attempt
/// budget is exhausted the *last* error is propagated unchanged. Errors for which
/// `is_retryable` returns false short-circuit immediately.
pub async fn run_with_retry<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    mut op: F,
    mut is_retryable: R,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: FnMut(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt == max_attempts || !is_retryable(&e) => return Err(e),
            Err(e) => {
                debug!("Attempt {attempt}/{max_attempts} failed, retrying. {e}");
                if !policy.backoff.is_zero() {
                    tokio::time::sleep(policy.backoff).await;
                }
            },
        }
    }
    unreachable!("bounded retry loop always returns")
}
