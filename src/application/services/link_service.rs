//! Link creation, resolution and retirement.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::alias_allocator::{AliasAllocator, AliasPolicy};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::deadline::with_deadline;
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;

/// Service for creating and resolving short links.
///
/// Handles URL normalization and alias allocation. The final say on alias
/// ownership belongs to the repository's atomic insert.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    allocator: AliasAllocator<L>,
    store_timeout: Duration,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, policy: AliasPolicy, store_timeout: Duration) -> Self {
        Self {
            allocator: AliasAllocator::new(link_repository.clone(), policy, store_timeout),
            link_repository,
            store_timeout,
        }
    }

    /// Creates a short link for `url`.
    ///
    /// # Alias Selection
    ///
    /// - If `requested_alias` is provided, it is validated and used as-is
    /// - Otherwise a random alias is generated
    ///
    /// A generated alias that loses a race to a concurrent creator is replaced
    /// with a fresh one, within the same attempt budget. A requested alias that
    /// loses the race is reported as taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the URL or requested alias is invalid.
    /// Returns [`AppError::AliasTaken`] if the requested alias is already issued.
    /// Returns [`AppError::AllocationExhausted`] if no free alias could be generated.
    /// Returns [`AppError::StoreUnavailable`] on storage errors or timeouts.
    pub async fn create_link(
        &self,
        url: String,
        requested_alias: Option<String>,
    ) -> Result<Link, AppError> {
        let normalized_url = normalize_url(&url).map_err(|e| {
            AppError::invalid_input("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let mut remaining = self.allocator.budget();

        loop {
            let alias = self
                .allocator
                .allocate(requested_alias.as_deref(), &mut remaining)
                .await?;

            let new_link = NewLink {
                url: normalized_url.clone(),
                alias,
            };

            match with_deadline(self.store_timeout, self.link_repository.create(new_link)).await {
                Ok(link) => {
                    tracing::info!(alias = %link.alias, url = %link.url, "Link created");
                    return Ok(link);
                }
                Err(AppError::AliasTaken { .. }) if requested_alias.is_none() => {
                    tracing::debug!(remaining, "Generated alias claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolves an alias to its live link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias is unknown or retired.
    /// Returns [`AppError::StoreUnavailable`] on storage errors or timeouts.
    pub async fn resolve(&self, alias: &str) -> Result<Link, AppError> {
        with_deadline(self.store_timeout, self.link_repository.find_by_alias(alias))
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))
    }

    /// Retires a link. Its alias remains reserved.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link owns the alias.
    /// Returns [`AppError::StoreUnavailable`] on storage errors or timeouts.
    pub async fn retire(&self, alias: &str) -> Result<(), AppError> {
        let retired = with_deadline(self.store_timeout, self.link_repository.retire(alias)).await?;

        if !retired {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": alias }),
            ));
        }

        tracing::info!(alias = %alias, "Link retired");
        Ok(())
    }

    /// Counts live links.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        with_deadline(self.store_timeout, self.link_repository.count()).await
    }
}
