use crate::core::quote::{FailureKind, FailureReason};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries an async fetch on network failures
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful result or the failure of the last attempt. Parse
/// failures are returned immediately since repeating the request won't help.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, FailureReason>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FailureReason>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || err.kind() != FailureKind::Network {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retries_network_failures() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(FailureReason::HttpStatus(503))
                } else {
                    Ok("ok")
                }
            },
            3,
            1,
        )
        .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FailureReason::Timeout)
            },
            2,
            1,
        )
        .await;

        assert_eq!(result, Err(FailureReason::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_parse_failures_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FailureReason::NoDocument)
            },
            5,
            1,
        )
        .await;

        assert_eq!(result, Err(FailureReason::NoDocument));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
