//! Capped exponential backoff for remote calls.

use crate::error::{SyncError, SyncResult};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry settings for remote operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each further one.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(4000),
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. Exhaustion yields
/// [`SyncError::RemoteUnavailable`].
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut op: F,
) -> SyncResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SyncResult<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 0..attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                warn!("Remote {} attempt {}/{} failed: {}", operation, attempt + 1, attempts, e);
                last_error = e.to_string();
                if attempt + 1 < attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(SyncError::RemoteUnavailable {
        operation,
        attempts,
        message: last_error,
    })
}
