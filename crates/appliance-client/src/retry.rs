//! # Retry
//!
//! Exponential backoff for reads.
//!
//! ```text
//! attempt 1 ──fail(retryable)──► wait 1s ──► attempt 2 ──fail──► wait 2s ──► ...
//!     │                                          │
//!     └──fail(not retryable)──► return error     └──ok──► return value
//! ```
//!
//! Only errors with [`ClientError::is_retryable`] are repeated; a 4xx is
//! returned on the first attempt.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoff;
use tracing::warn;

use crate::config::RetrySettings;
use crate::error::{ClientError, ClientResult};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default first delay.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Retry policy derived from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        RetryPolicy {
            max_retries: settings.max_retries,
            initial_delay: Duration::from_millis(settings.initial_backoff_ms),
            max_delay: Duration::from_secs(settings.max_backoff_secs),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_delay,
            max_interval: self.max_delay.max(self.initial_delay),
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or has
/// been retried `policy.max_retries` times.
pub async fn retry_with_backoff<T, F, Fut>(policy: RetryPolicy, mut op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let attempts = AtomicU32::new(0);

    backoff::future::retry(policy.backoff(), || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        let fut = op();
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                    warn!(attempt = attempt + 1, max = policy.max_retries, error = %e, "Retrying request");
                    Err(backoff::Error::transient(e))
                }
                Err(e) => Err(backoff::Error::permanent(e)),
            }
        }
    })
    .await
}

/// Retries only when `policy.max_retries > 0`; otherwise runs `op` once.
pub async fn maybe_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    if policy.max_retries == 0 {
        op().await
    } else {
        retry_with_backoff(policy, op).await
    }
}
