//! Read-time projection of click events.

use std::collections::HashMap;

use super::Click;

/// Format of `daily` keys. Days are UTC calendar days.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Click totals for one alias, recomputed on every request.
///
/// Holds no state of its own. Both histograms always sum to `total_clicks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub alias: String,
    pub total_clicks: u64,
    /// `YYYY-MM-DD` (UTC) -> clicks that day.
    pub daily: HashMap<String, u64>,
    /// Raw user-agent string -> clicks.
    pub user_agent: HashMap<String, u64>,
}

impl AnalyticsSummary {
    /// An empty summary for an alias with no clicks.
    pub fn empty(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Self::default()
        }
    }

    /// Folds one click into all three counters.
    pub fn add(&mut self, click: &Click) {
        self.total_clicks += 1;

        let day = click
            .created_at
            .format(DAY_KEY_FORMAT)
            .to_string();
        *self.daily.entry(day).or_insert(0) += 1;

        *self
            .user_agent
            .entry(click.user_agent.clone())
            .or_insert(0) += 1;
    }
}
