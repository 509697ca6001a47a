//! Alias allocation: validate a requested alias or generate a free one.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::alias::{generate_alias, validate_alias};
use crate::utils::deadline::with_deadline;

/// Shape of generated aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasPolicy {
    /// Length of generated aliases.
    pub length: usize,
    /// Generation attempts before giving up with `AllocationExhausted`.
    pub max_attempts: usize,
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self {
            length: 7,
            max_attempts: 10,
        }
    }
}

/// Produces candidate aliases for new links.
///
/// Allocation only proposes a string; it reserves nothing. Ownership is
/// settled by the atomic [`LinkRepository::create`], which may still reject
/// a candidate that another request claimed in between.
pub struct AliasAllocator<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    policy: AliasPolicy,
    store_timeout: Duration,
}

impl<L: LinkRepository + ?Sized> AliasAllocator<L> {
    /// Creates a new allocator.
    pub fn new(repository: Arc<L>, policy: AliasPolicy, store_timeout: Duration) -> Self {
        Self {
            repository,
            policy,
            store_timeout,
        }
    }

    /// Starts a fresh generation budget of `max_attempts`.
    pub fn budget(&self) -> usize {
        self.policy.max_attempts.max(1)
    }

    /// Returns an alias that was unused at the time of the check.
    ///
    /// Each generated candidate spends one unit of `remaining`. Callers that
    /// retry after losing a create race pass the same budget back in, so the
    /// whole creation is bounded by `max_attempts` generations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `requested` is malformed.
    /// Returns [`AppError::AliasTaken`] if `requested` is already issued.
    /// Returns [`AppError::AllocationExhausted`] once `remaining` reaches zero
    /// without a free alias.
    /// Returns [`AppError::StoreUnavailable`] on storage errors.
    pub async fn allocate(
        &self,
        requested: Option<&str>,
        remaining: &mut usize,
    ) -> Result<String, AppError> {
        if let Some(alias) = requested {
            validate_alias(alias)?;

            if self.exists(alias).await? {
                return Err(AppError::alias_taken(alias));
            }

            return Ok(alias.to_string());
        }

        while *remaining > 0 {
            *remaining -= 1;
            let candidate = generate_alias(self.policy.length);

            if !self.exists(&candidate).await? {
                return Ok(candidate);
            }

            tracing::debug!(alias = %candidate, "Generated alias collided, retrying");
        }

        tracing::warn!(
            attempts = self.policy.max_attempts,
            length = self.policy.length,
            "Alias generation exhausted"
        );
        Err(AppError::allocation_exhausted(self.policy.max_attempts))
    }

    async fn exists(&self, alias: &str) -> Result<bool, AppError> {
        with_deadline(self.store_timeout, self.repository.alias_exists(alias)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;

    fn allocator(mock: MockLinkRepository, policy: AliasPolicy) -> AliasAllocator<MockLinkRepository> {
        AliasAllocator::new(Arc::new(mock), policy, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_requested_alias_free() {
        let mut mock = MockLinkRepository::new();
        mock.expect_alias_exists()
            .withf(|alias| alias == "go2")
            .times(1)
            .returning(|_| Ok(false));

        let result = allocator(mock, AliasPolicy::default())
            .allocate(Some("go2"), &mut 10)
            .await;

        assert_eq!(result.unwrap(), "go2");
    }

    #[tokio::test]
    async fn test_requested_alias_taken() {
        let mut mock = MockLinkRepository::new();
        mock.expect_alias_exists().times(1).returning(|_| Ok(true));

        let result = allocator(mock, AliasPolicy::default())
            .allocate(Some("go2"), &mut 10)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::AliasTaken { .. }));
    }

    #[tokio::test]
    async fn test_requested_alias_invalid_skips_store() {
        let mut mock = MockLinkRepository::new();
        mock.expect_alias_exists().times(0);

        let result = allocator(mock, AliasPolicy::default())
            .allocate(Some("not valid!"), &mut 10)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_generated_alias_retries_on_collision() {
        let mut mock = MockLinkRepository::new();
        let mut calls = 0;
        mock.expect_alias_exists().times(3).returning(move |_| {
            calls += 1;
            Ok(calls < 3)
        });

        let policy = AliasPolicy {
            length: 9,
            max_attempts: 5,
        };
        let mut remaining = 5;
        let alias = allocator(mock, policy)
            .allocate(None, &mut remaining)
            .await
            .unwrap();

        assert_eq!(alias.len(), 9);
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_generated_alias_exhausted() {
        let mut mock = MockLinkRepository::new();
        mock.expect_alias_exists().times(4).returning(|_| Ok(true));

        let policy = AliasPolicy {
            length: 7,
            max_attempts: 4,
        };
        let mut remaining = 4;
        let result = allocator(mock, policy).allocate(None, &mut remaining).await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::AllocationExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_spent_budget_skips_store() {
        let mut mock = MockLinkRepository::new();
        mock.expect_alias_exists().times(0);

        let result = allocator(mock, AliasPolicy::default())
            .allocate(None, &mut 0)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::AllocationExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_store_error_is_not_masked() {
        let mut mock = MockLinkRepository::new();
        mock.expect_alias_exists()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable()));

        let result = allocator(mock, AliasPolicy::default())
            .allocate(None, &mut 10)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::StoreUnavailable { .. }
        ));
    }
}
