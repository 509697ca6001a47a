//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A short alias bound to its target URL.
///
/// Links are append-only: once created, neither the alias nor the target
/// changes. Retiring a link hides it from lookups but keeps the alias
/// reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: Uuid,
    pub url: String,
    pub alias: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: Uuid, url: String, alias: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            url,
            alias,
            created_at,
        }
    }
}

/// Input data for creating a new link.
///
/// The URL is expected to be normalized and the alias already allocated.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub url: String,
    pub alias: String,
}
