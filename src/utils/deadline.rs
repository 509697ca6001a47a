//! Bounded waits on store operations.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Runs a store operation with an upper bound on its duration.
///
/// An operation that does not finish within `limit` is abandoned and reported
/// as [`AppError::StoreUnavailable`]. Dropping the inner future cancels it.
pub async fn with_deadline<T, F>(limit: Duration, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Store operation timed out");
            Err(AppError::store_unavailable())
        }
    }
}
