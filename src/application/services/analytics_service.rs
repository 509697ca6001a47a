//! Per-alias click analytics.
//!
//! Summaries are recomputed from the click log on every request. Nothing
//! derived is cached or stored.

use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use serde_json::json;

use crate::domain::entities::{AnalyticsSummary, Click};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::deadline::with_deadline;

/// One page of raw clicks plus the total available.
#[derive(Debug, Clone)]
pub struct ClickPage {
    pub total: i64,
    pub items: Vec<Click>,
}

pub struct AnalyticsService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
    store_timeout: Duration,
}

impl<L, C> AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>, store_timeout: Duration) -> Self {
        Self {
            link_repository,
            click_repository,
            store_timeout,
        }
    }

    /// Aggregates every click on `alias` into totals per UTC day and per
    /// user agent.
    ///
    /// A live link with no clicks yields an empty summary, not an error.
    /// The whole scan runs under the store deadline; when it expires the
    /// stream is dropped and the read stops.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link owns the alias.
    /// Returns [`AppError::StoreUnavailable`] on storage errors or timeouts.
    pub async fn summarize(&self, alias: &str) -> Result<AnalyticsSummary, AppError> {
        self.ensure_live(alias).await?;

        let clicks = self.click_repository.stream_by_alias(alias);
        let fold = clicks.try_fold(AnalyticsSummary::empty(alias), |mut summary, click| async move {
            summary.add(&click);
            Ok::<_, AppError>(summary)
        });

        let summary = with_deadline(self.store_timeout, fold).await?;

        tracing::debug!(alias = %alias, total = summary.total_clicks, "Summary computed");
        Ok(summary)
    }

    /// Lists raw clicks on `alias`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link owns the alias.
    /// Returns [`AppError::StoreUnavailable`] on storage errors or timeouts.
    pub async fn list_clicks(
        &self,
        alias: &str,
        offset: i64,
        limit: i64,
    ) -> Result<ClickPage, AppError> {
        self.ensure_live(alias).await?;

        let total = with_deadline(self.store_timeout, self.click_repository.count_by_alias(alias)).await?;
        let items = with_deadline(
            self.store_timeout,
            self.click_repository.list_by_alias(alias, offset, limit),
        )
        .await?;

        Ok(ClickPage { total, items })
    }

    async fn ensure_live(&self, alias: &str) -> Result<(), AppError> {
        with_deadline(self.store_timeout, self.link_repository.find_by_alias(alias))
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::ClickService;
    use crate::domain::click_event::ClickEvent;
    use crate::domain::entities::NewLink;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::infrastructure::persistence::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use futures::StreamExt;

    fn click_at(alias: &str, user_agent: &str, ip: &str, at: DateTime<Utc>) -> ClickEvent {
        ClickEvent {
            received_at: at,
            ..ClickEvent::new(alias.to_string(), Some(user_agent), ip.to_string())
        }
    }

    async fn store_with(alias: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewLink {
                url: "https://example.com/".to_string(),
                alias: alias.to_string(),
            })
            .await
            .unwrap();
        store
    }

    fn services(
        store: &Arc<MemoryStore>,
    ) -> (
        ClickService<MemoryStore, MemoryStore>,
        AnalyticsService<MemoryStore, MemoryStore>,
    ) {
        let timeout = Duration::from_secs(1);
        (
            ClickService::new(store.clone(), store.clone(), timeout),
            AnalyticsService::new(store.clone(), store.clone(), timeout),
        )
    }

    #[tokio::test]
    async fn test_summary_for_link_without_clicks() {
        let store = store_with("go2").await;
        let (_, analytics) = services(&store);

        let summary = analytics.summarize("go2").await.unwrap();

        assert_eq!(summary, AnalyticsSummary::empty("go2"));
    }

    #[tokio::test]
    async fn test_summary_unknown_alias() {
        let store = Arc::new(MemoryStore::new());
        let (_, analytics) = services(&store);

        let result = analytics.summarize("nope").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_summary_two_days_same_agent() {
        let store = store_with("go2").await;
        let (clicks, analytics) = services(&store);

        let day_one = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let day_two = Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap();
        clicks.record(&click_at("go2", "curl/8.0", "1.1.1.1", day_one)).await.unwrap();
        clicks.record(&click_at("go2", "curl/8.0", "1.1.1.1", day_two)).await.unwrap();

        let summary = analytics.summarize("go2").await.unwrap();

        assert_eq!(summary.total_clicks, 2);
        assert_eq!(summary.daily.len(), 2);
        assert_eq!(summary.daily["2024-05-01"], 1);
        assert_eq!(summary.daily["2024-05-02"], 1);
        assert_eq!(summary.user_agent.len(), 1);
        assert_eq!(summary.user_agent["curl/8.0"], 2);
    }

    #[tokio::test]
    async fn test_summary_conserves_counts_and_is_idempotent() {
        let store = store_with("go2").await;
        let (clicks, analytics) = services(&store);

        let agents = ["a", "b", "", "a", "c"];
        for (i, ua) in agents.iter().enumerate() {
            let at = Utc.with_ymd_and_hms(2024, 1, 1 + i as u32 % 2, 12, 0, 0).unwrap();
            clicks.record(&click_at("go2", ua, "1.2.3.4", at)).await.unwrap();
        }

        let first = analytics.summarize("go2").await.unwrap();
        let second = analytics.summarize("go2").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total_clicks, agents.len() as u64);
        assert_eq!(first.daily.values().sum::<u64>(), first.total_clicks);
        assert_eq!(first.user_agent.values().sum::<u64>(), first.total_clicks);
    }

    #[tokio::test]
    async fn test_summary_stream_error_propagates() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_alias().returning(|alias| {
            Ok(Some(crate::domain::entities::Link::new(
                uuid::Uuid::new_v4(),
                "https://example.com/".to_string(),
                alias.to_string(),
                Utc::now(),
            )))
        });

        let mut clicks = MockClickRepository::new();
        clicks.expect_stream_by_alias().returning(|_| {
            futures::stream::iter(vec![Err(AppError::store_unavailable())]).boxed()
        });

        let analytics =
            AnalyticsService::new(Arc::new(links), Arc::new(clicks), Duration::from_secs(1));

        let result = analytics.summarize("go2").await;

        assert!(matches!(result.unwrap_err(), AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_list_clicks_newest_first() {
        let store = store_with("go2").await;
        let (clicks, analytics) = services(&store);

        for day in 1..=3 {
            let at = Utc.with_ymd_and_hms(2024, 2, day, 0, 0, 0).unwrap();
            clicks.record(&click_at("go2", "ua", "1.2.3.4", at)).await.unwrap();
        }

        let page = analytics.list_clicks("go2", 0, 2).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].created_at.format("%d").to_string(), "03");
        assert!(page.items[0].created_at > page.items[1].created_at);
    }
}
