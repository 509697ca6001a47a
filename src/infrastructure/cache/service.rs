//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache of alias -> target URL for the redirect path.
///
/// The cache is never authoritative. A miss, or any backend failure, falls
/// through to the link store, so a broken cache slows redirects down but
/// never changes their outcome.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the target URL for an alias.
    ///
    /// Returns `Ok(None)` on a miss. Backend errors are logged and reported
    /// as misses.
    async fn get_target(&self, alias: &str) -> CacheResult<Option<String>>;

    /// Stores the target URL for an alias.
    ///
    /// `ttl_seconds` overrides the implementation's default TTL.
    async fn set_target(&self, alias: &str, url: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Drops the cached entry for an alias. Called when a link is retired.
    async fn invalidate(&self, alias: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
