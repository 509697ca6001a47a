//! Repository trait for link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable mapping from alias to target URL.
///
/// The store is the single authority on alias ownership: [`create`] checks
/// and inserts in one atomic step, so concurrent creators of the same alias
/// cannot both succeed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryStore`] - process-local
/// - Test mocks available with `cfg(test)`
///
/// [`create`]: LinkRepository::create
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link, claiming its alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if the alias has ever been issued,
    /// including to a retired link.
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds the live link owning `alias`.
    ///
    /// Retired links are not returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError>;

    /// Whether `alias` was ever issued, retired links included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError>;

    /// Retires a link. The alias stays reserved.
    ///
    /// Returns `Ok(true)` if a live link was retired, `Ok(false)` if none matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn retire(&self, alias: &str) -> Result<bool, AppError>;

    /// Counts live links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;
}
