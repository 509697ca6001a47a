//! DTOs for link shortening endpoint.

use crate::domain::entities::Link;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL (HTTP or HTTPS). Normalized before storage.
    #[validate(length(min = 1, max = 4096))]
    pub url: String,

    /// Optional alias to claim instead of a generated one.
    #[validate(length(min = 1, max = 64))]
    pub alias: Option<String>,
}

/// A created link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub id: Uuid,
    pub url: String,
    pub alias: String,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for ShortenResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            url: link.url,
            alias: link.alias,
            created_at: link.created_at,
        }
    }
}
