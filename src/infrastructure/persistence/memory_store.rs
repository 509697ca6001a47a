//! Process-local store backed by concurrent hash maps.
//!
//! Implements both repositories over one shared state so that click appends
//! can observe link retirement. Data lives only as long as the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

struct StoredLink {
    link: Link,
    retired_at: Option<DateTime<Utc>>,
}

impl StoredLink {
    fn is_live(&self) -> bool {
        self.retired_at.is_none()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    links: DashMap<String, StoredLink>,
    clicks: DashMap<String, Vec<Click>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.alias.clone()) {
            Entry::Occupied(_) => Err(AppError::alias_taken(&new_link.alias)),
            Entry::Vacant(slot) => {
                let link = Link::new(Uuid::new_v4(), new_link.url, new_link.alias, Utc::now());
                slot.insert(StoredLink {
                    link: link.clone(),
                    retired_at: None,
                });
                Ok(link)
            }
        }
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .get(alias)
            .filter(|stored| stored.is_live())
            .map(|stored| stored.link.clone()))
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(alias))
    }

    async fn retire(&self, alias: &str) -> Result<bool, AppError> {
        let Some(mut stored) = self.links.get_mut(alias) else {
            return Ok(false);
        };

        if !stored.is_live() {
            return Ok(false);
        }

        stored.retired_at = Some(Utc::now());
        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.iter().filter(|entry| entry.is_live()).count() as i64)
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn append(&self, new_click: NewClick) -> Result<Click, AppError> {
        // The link guard is held across the push so a concurrent retire
        // cannot slip in between the check and the write.
        let link = self
            .links
            .get(&new_click.alias)
            .filter(|stored| stored.is_live());

        let Some(_live) = link else {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": new_click.alias }),
            ));
        };

        let mut clicks = self.clicks.entry(new_click.alias.clone()).or_default();
        if let Some(existing) = clicks.iter().find(|c| c.id == new_click.id) {
            return Ok(existing.clone());
        }

        let click = new_click.into_click();
        clicks.push(click.clone());

        Ok(click)
    }

    fn stream_by_alias(&self, alias: &str) -> BoxStream<'static, Result<Click, AppError>> {
        let snapshot = self
            .clicks
            .get(alias)
            .map(|clicks| clicks.value().clone())
            .unwrap_or_default();

        stream::iter(snapshot.into_iter().map(Ok)).boxed()
    }

    async fn list_by_alias(
        &self,
        alias: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let mut clicks = self
            .clicks
            .get(alias)
            .map(|clicks| clicks.value().clone())
            .unwrap_or_default();

        clicks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        Ok(clicks
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_by_alias(&self, alias: &str) -> Result<i64, AppError> {
        Ok(self
            .clicks
            .get(alias)
            .map(|clicks| clicks.len() as i64)
            .unwrap_or(0))
    }
}
