//! Retry loop shared by every outbound call.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use rollback_core::RetryConfig;

use crate::error::ApiError;

/// Run `op` under the given retry policy.
///
/// Only transient failures are retried (see [`ApiError::is_transient`]);
/// backoff sleeps are raced against the cancellation token so an aborted
/// caller never waits out a delay.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryConfig,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt: u32 = 1;
    loop {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient API failure, retrying"
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
