//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Alias ownership is enforced by the `links_alias_key` unique constraint;
/// inserts use `ON CONFLICT DO NOTHING` so a lost race surfaces as
/// [`AppError::AliasTaken`] rather than a database error.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    id: Uuid,
    url: String,
    alias: String,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.id, row.url, row.alias, row.created_at)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (id, url, alias)
            VALUES ($1, $2, $3)
            ON CONFLICT (alias) DO NOTHING
            RETURNING id, url, alias, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_link.url)
        .bind(&new_link.alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| AppError::alias_taken(&new_link.alias))
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, url, alias, created_at
            FROM links
            WHERE alias = $1 AND retired_at IS NULL
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE alias = $1)")
                .bind(alias)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn retire(&self, alias: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE links SET retired_at = NOW() WHERE alias = $1 AND retired_at IS NULL",
        )
        .bind(alias)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE retired_at IS NULL")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
