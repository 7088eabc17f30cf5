use std::future::Future;

use crate::error::StoreResult;

/// Run an idempotent read, retrying exactly once on a transient failure.
///
/// Only `get` and `list` go through this wrapper. Writes and deletes are
/// never auto-retried: a prior attempt's success cannot be distinguished
/// from failure without re-reading the hash, so the caller must re-read and
/// re-issue with a fresh precondition instead.
pub async fn with_read_retry<T, F, Fut>(op: F) -> StoreResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    match op().await {
        Err(err) if err.is_transient() => {
            tracing::debug!(error = %err, "transient read failure, retrying once");
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use vellum_types::VaultPath;

    use super::*;
    use crate::error::StoreError;

    fn transient() -> StoreError {
        StoreError::Transient {
            path: VaultPath::new("a").unwrap(),
            reason: "timeout".into(),
        }
    }

    #[tokio::test]
    async fn passes_through_success() {
        let calls = AtomicUsize::new(0);
        let result = with_read_retry(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(42)
        })
        .await
        .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_once() {
        let calls = AtomicUsize::new(0);
        let result = with_read_retry(|| async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(transient())
            } else {
                Ok(7)
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_second_transient() {
        let calls = AtomicUsize::new(0);
        let result: StoreResult<()> = with_read_retry(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        })
        .await;
        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_semantic_errors() {
        let calls = AtomicUsize::new(0);
        let result: StoreResult<()> = with_read_retry(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::NotFound(VaultPath::new("a").unwrap()))
        })
        .await;
        assert!(matches!(result.unwrap_err(), StoreError::NotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
