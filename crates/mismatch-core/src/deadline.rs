//! Bounded store calls.
//!
//! Every call the composer makes into a repository goes through [`bounded`],
//! so a hung store surfaces as [`Error::StoreUnavailable`] instead of
//! blocking the request indefinitely. No retry happens here.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Error, Result};
use crate::logging::{COMPONENT_DEADLINE, SUBSYSTEM_COMPOSER};

/// Run `fut`, failing with `StoreUnavailable` if it exceeds `timeout`.
///
/// `op` names the call in the error message and log line, e.g.
/// `"outfits.insert"`.
pub async fn bounded<T, F>(op: &'static str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                subsystem = SUBSYSTEM_COMPOSER,
                component = COMPONENT_DEADLINE,
                op,
                timeout_ms = timeout.as_millis() as u64,
                "Store call exceeded its deadline"
            );
            Err(Error::StoreUnavailable(format!(
                "{} exceeded {}ms",
                op,
                timeout.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_result() {
        let value = bounded("test.ok", Duration::from_millis(50), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_error() {
        let err = bounded::<(), _>("test.err", Duration::from_millis(50), async {
            Err(Error::NotFound("thing".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let err = bounded("test.slow", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await
        .unwrap_err();

        match err {
            Error::StoreUnavailable(msg) => {
                assert!(msg.contains("test.slow"));
                assert!(msg.contains("50ms"));
            }
            other => panic!("expected StoreUnavailable, got {:?}", other),
        }
    }
}
