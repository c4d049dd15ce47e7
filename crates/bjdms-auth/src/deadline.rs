//! Deadline wrapper for store round-trips.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use bjdms_core::error::AppError;
use bjdms_core::result::AppResult;

/// Run `fut`, turning an elapsed deadline into `ServiceUnavailable`.
pub(crate) async fn with_deadline<T, F>(
    deadline: Duration,
    operation: &'static str,
    fut: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = deadline.as_millis() as u64,
                "Store call timed out"
            );
            Err(AppError::service_unavailable(format!("{operation} timed out")))
        }
    }
}
