//! Repository trait for click events.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Append-only store of click events.
///
/// There is no update or delete path. Readers see a snapshot; events appended
/// while a stream is being consumed may or may not appear in it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click event for a live link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link owns the alias; nothing
    /// is stored in that case.
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn append(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Streams every click recorded for `alias`, in no particular order.
    ///
    /// Dropping the stream stops the underlying read.
    fn stream_by_alias(&self, alias: &str) -> BoxStream<'static, Result<Click, AppError>>;

    /// Lists clicks for `alias`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn list_by_alias(
        &self,
        alias: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError>;

    /// Counts clicks recorded for `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn count_by_alias(&self, alias: &str) -> Result<i64, AppError>;
}
