//! Retries of relay work with exponential backoff.

use core::future::Future;
use core::time::Duration;

use futures_timer::Delay;
use tracing::{debug, warn};

use crate::error::RelayerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A policy that gives up on the first failure.
    pub fn never() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// The pause before retry number `attempt`, counting from zero. Doubles
    /// with every attempt up to `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

/// Milliseconds in `delay`, saturating at `u64::MAX`.
fn saturating_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Runs `operation` until it succeeds, fails with a non-transient error, or
/// the policy runs out of retries.
///
/// Each retry calls `operation` again, so a step that fetches a proof fetches
/// a fresh one.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    name: &str,
    mut operation: F,
) -> Result<T, RelayerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RelayerError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                debug!(
                    error = %e,
                    attempt,
                    delay_ms = saturating_millis(delay),
                    "{name} failed, retrying"
                );
                Delay::new(delay).await;
                attempt += 1;
            }
            Err(e) if e.is_transient() => {
                warn!(error = %e, attempts = attempt + 1, "{name} failed, giving up");
                return Err(RelayerError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(e),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
