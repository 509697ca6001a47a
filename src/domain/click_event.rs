//! Click event captured by the redirect handler.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Request metadata captured when a redirect is served.
///
/// Passed from the redirect handler to the background worker via a channel,
/// so the HTTP response does not wait for the write. `received_at` is read
/// from the server clock by the handler; no client-supplied time is used.
/// `id` becomes the stored click's identifier, so a retried recording of the
/// same event cannot be counted twice.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler
/// 2. Sent to the channel (non-blocking)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Recorded via [`crate::application::services::ClickService::record`]
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub id: Uuid,
    pub alias: String,
    pub user_agent: String,
    pub ip: String,
    pub received_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current server time.
    ///
    /// A missing `User-Agent` header is stored as an empty string.
    pub fn new(alias: String, user_agent: Option<&str>, ip: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            alias,
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip,
            received_at: Utc::now(),
        }
    }
}
