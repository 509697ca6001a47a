//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

const CLICK_COLUMNS: &str = "id, alias, user_agent, device, os, browser, ip, created_at";

/// PostgreSQL repository for the append-only click log.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ClickRow {
    id: Uuid,
    alias: String,
    user_agent: String,
    device: String,
    os: String,
    browser: String,
    ip: String,
    created_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click {
            id: row.id,
            alias: row.alias,
            user_agent: row.user_agent,
            device: row.device,
            os: row.os,
            browser: row.browser,
            ip: row.ip,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn append(&self, new_click: NewClick) -> Result<Click, AppError> {
        // Insert only while the link is live. A replayed id returns the row
        // already stored; the second branch cannot see the CTE's own insert.
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO click_events (id, alias, user_agent, device, os, browser, ip, created_at)
                SELECT $1, l.alias, $3, $4, $5, $6, $7, $8
                FROM links l
                WHERE l.alias = $2 AND l.retired_at IS NULL
                ON CONFLICT (id) DO NOTHING
                RETURNING {CLICK_COLUMNS}
            )
            SELECT {CLICK_COLUMNS} FROM inserted
            UNION ALL
            SELECT {CLICK_COLUMNS} FROM click_events WHERE id = $1
            LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(new_click.id)
            .bind(&new_click.alias)
            .bind(&new_click.user_agent)
            .bind(&new_click.device)
            .bind(&new_click.os)
            .bind(&new_click.browser)
            .bind(&new_click.ip)
            .bind(new_click.created_at)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Click::from).ok_or_else(|| {
            AppError::not_found(
                "Short link not found",
                json!({ "alias": new_click.alias }),
            )
        })
    }

    fn stream_by_alias(&self, alias: &str) -> BoxStream<'static, Result<Click, AppError>> {
        let pool = self.pool.clone();
        let alias = alias.to_string();

        async_stream::try_stream! {
            let sql = format!("SELECT {CLICK_COLUMNS} FROM click_events WHERE alias = $1");
            let mut rows = sqlx::query_as::<_, ClickRow>(&sql)
                .bind(&alias)
                .fetch(pool.as_ref())
                .map_err(AppError::from);

            while let Some(row) = rows.try_next().await? {
                yield Click::from(row);
            }
        }
        .boxed()
    }

    async fn list_by_alias(
        &self,
        alias: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let sql = format!(
            r#"
            SELECT {CLICK_COLUMNS}
            FROM click_events
            WHERE alias = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(alias)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_alias(&self, alias: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_events WHERE alias = $1")
            .bind(alias)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
