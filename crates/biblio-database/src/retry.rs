//! Single-retry wrapper for idempotent read queries.

use std::future::Future;

use tracing::warn;

use biblio_core::error::ErrorKind;
use biblio_core::result::AppResult;

/// Run an idempotent read, retrying once if the first attempt fails with
/// an infrastructure error. Mutations must never go through this wrapper;
/// a retried mutation could apply twice.
pub async fn retry_read<T, F, Fut>(mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(err) if is_transient(err.kind) => {
            warn!(error = %err, "Read query failed, retrying once");
            op().await
        }
        Err(err) => Err(err),
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::Database | ErrorKind::ServiceUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_core::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_success_runs_once() {
        let calls = AtomicUsize::new(0);
        let result = retry_read(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_retried_once() {
        let calls = AtomicUsize::new(0);
        let result = retry_read(|| async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(AppError::database("connection reset"))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_failure_stops_after_second_attempt() {
        let calls = AtomicUsize::new(0);
        let result: AppResult<i32> = retry_read(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::database("still down"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_domain_error_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: AppResult<i32> = retry_read(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::not_found("no such book"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
