//! Click recording.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::deadline::with_deadline;
use crate::utils::user_agent::classify;

/// Records redirect traversals as click events.
pub struct ClickService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
    store_timeout: Duration,
}

impl<L, C> ClickService<L, C>
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

    /// Records one click on a live link.
    ///
    /// The user agent is classified here, once, and the derived fields are
    /// stored with the raw string. Recording the same event again stores
    /// nothing new and returns the click already on file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link owns the alias. Nothing
    /// is stored in that case.
    /// Returns [`AppError::StoreUnavailable`] on storage errors or timeouts.
    pub async fn record(&self, event: &ClickEvent) -> Result<Click, AppError> {
        let alias = event.alias.as_str();
        let exists = with_deadline(self.store_timeout, self.link_repository.find_by_alias(alias))
            .await?
            .is_some();

        if !exists {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": alias }),
            ));
        }

        let client = classify(&event.user_agent);
        let new_click = NewClick {
            id: event.id,
            alias: event.alias.clone(),
            user_agent: event.user_agent.clone(),
            device: client.device,
            os: client.os,
            browser: client.browser,
            ip: event.ip.clone(),
            created_at: event.received_at,
        };

        with_deadline(self.store_timeout, self.click_repository.append(new_click)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Link, NewLink};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::infrastructure::persistence::MemoryStore;
    use chrono::Utc;
    use uuid::Uuid;

    const CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    fn event(alias: &str, user_agent: &str, ip: &str) -> ClickEvent {
        ClickEvent::new(alias.to_string(), Some(user_agent), ip.to_string())
    }

    fn live_link(alias: &str) -> Link {
        Link::new(
            Uuid::new_v4(),
            "https://example.com/".to_string(),
            alias.to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_record_classifies_and_appends() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_alias()
            .times(1)
            .returning(|alias| Ok(Some(live_link(alias))));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_append()
            .withf(|c| c.alias == "go2" && c.device == "desktop" && c.user_agent == CHROME)
            .times(1)
            .returning(|c| Ok(c.into_click()));

        let service = ClickService::new(Arc::new(links), Arc::new(clicks), Duration::from_secs(1));
        let event = event("go2", CHROME, "1.2.3.4");

        let click = service.record(&event).await.unwrap();

        assert_eq!(click.id, event.id);
        assert_eq!(click.created_at, event.received_at);
        assert_eq!(click.ip, "1.2.3.4");
    }

    #[tokio::test]
    async fn test_record_unknown_alias_stores_nothing() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_alias().times(1).returning(|_| Ok(None));

        let mut clicks = MockClickRepository::new();
        clicks.expect_append().times(0);

        let service = ClickService::new(Arc::new(links), Arc::new(clicks), Duration::from_secs(1));

        let result = service.record(&event("missing", "", "1.2.3.4")).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_empty_user_agent_is_unknown() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewLink {
                url: "https://example.com/".to_string(),
                alias: "go2".to_string(),
            })
            .await
            .unwrap();

        let service = ClickService::new(store.clone(), store.clone(), Duration::from_secs(1));
        let click = service.record(&event("go2", "", "::1")).await.unwrap();

        assert_eq!(click.user_agent, "");
        assert_eq!(click.device, "unknown");
        assert_eq!(click.browser, "unknown");
        assert_eq!(store.count_by_alias("go2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recording_same_event_twice_stores_once() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewLink {
                url: "https://example.com/".to_string(),
                alias: "go2".to_string(),
            })
            .await
            .unwrap();

        let service = ClickService::new(store.clone(), store.clone(), Duration::from_secs(1));
        let event = event("go2", CHROME, "1.2.3.4");

        let first = service.record(&event).await.unwrap();
        let second = service.record(&event).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.count_by_alias("go2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_store_failure_propagates() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_alias()
            .returning(|alias| Ok(Some(live_link(alias))));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_append()
            .returning(|_| Err(AppError::store_unavailable()));

        let service = ClickService::new(Arc::new(links), Arc::new(clicks), Duration::from_secs(1));

        let err = service
            .record(&event("go2", CHROME, "1.2.3.4"))
            .await
            .unwrap_err();

        assert!(err.is_transient());
    }
}
