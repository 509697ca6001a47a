//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An immutable record of one redirect traversal.
///
/// `device`, `os` and `browser` are derived from `user_agent` once, when the
/// click is recorded, and stored alongside it. They are never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: Uuid,
    pub alias: String,
    pub user_agent: String,
    pub device: String,
    pub os: String,
    pub browser: String,
    pub ip: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for appending a click event.
///
/// `id` is minted once, when the redirect is served, and reused on every
/// retry so that appending is idempotent. `created_at` comes from the server
/// clock at the same moment.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub id: Uuid,
    pub alias: String,
    pub user_agent: String,
    pub device: String,
    pub os: String,
    pub browser: String,
    pub ip: String,
    pub created_at: DateTime<Utc>,
}

impl NewClick {
    /// Materializes the stored record.
    pub fn into_click(self) -> Click {
        Click {
            id: self.id,
            alias: self.alias,
            user_agent: self.user_agent,
            device: self.device,
            os: self.os,
            browser: self.browser,
            ip: self.ip,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_click_keeps_fields_and_id() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let new_click = NewClick {
            id,
            alias: "go2".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            device: "pc".to_string(),
            os: "Linux".to_string(),
            browser: "Firefox".to_string(),
            ip: "1.2.3.4".to_string(),
            created_at: now,
        };

        let a = new_click.clone().into_click();
        let b = new_click.into_click();

        assert_eq!(a.id, id);
        assert_eq!(a, b);
        assert_eq!(a.alias, "go2");
        assert_eq!(a.created_at, now);
        assert_eq!(a.ip, "1.2.3.4");
    }
}
