//! DTOs for the raw click listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::dto::pagination::PaginationMeta;
use crate::domain::entities::Click;

/// One stored click event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickInfo {
    pub id: Uuid,
    pub alias: String,
    pub user_agent: String,
    pub device: String,
    pub os: String,
    pub browser: String,
    pub ip: String,
    pub created_at: DateTime<Utc>,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            alias: click.alias,
            user_agent: click.user_agent,
            device: click.device,
            os: click.os,
            browser: click.browser,
            ip: click.ip,
            created_at: click.created_at,
        }
    }
}

/// Response of `GET /analytics/{alias}/clicks`, newest first.
#[derive(Debug, Serialize)]
pub struct ClickListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<ClickInfo>,
}
