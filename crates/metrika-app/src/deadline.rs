//! Deadline and cancellation wrapper for external calls
//!
//! Every store and recognizer call runs under this wrapper: the call either
//! completes, hits its deadline, or is cut short the moment the token fires
//! (Ctrl-C in the CLI).

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use metrika_types::{Error, Result};

/// Run a fallible future under a deadline and a cancellation token.
///
/// Cancellation wins over an in-flight call; a deadline hit maps to
/// `Error::Timeout` carrying the configured seconds.
pub async fn with_deadline<F, T>(
    token: &CancellationToken,
    timeout: Duration,
    future: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(Error::Cancelled),
        outcome = tokio::time::timeout(timeout, future) => match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout.as_secs())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let token = CancellationToken::new();
        let result = with_deadline(&token, Duration::from_secs(5), async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let token = CancellationToken::new();
        let result: Result<i32> = with_deadline(&token, Duration::from_secs(5), async {
            Err(Error::InvalidValue("nope".to_string()))
        })
        .await;
        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let token = CancellationToken::new();
        let result: Result<()> = with_deadline(&token, Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts() {
        let token = CancellationToken::new();
        token.cancel();

        let result: Result<()> = with_deadline(&token, Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_during_call() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            child.cancel();
        });

        let result: Result<()> = with_deadline(&token, Duration::from_secs(30), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
