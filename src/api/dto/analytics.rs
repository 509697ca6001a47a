//! DTO for the analytics summary endpoint.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::AnalyticsSummary;

/// Summary contract of `GET /analytics/{alias}`.
///
/// Maps are emitted in key order so identical summaries serialize
/// identically; clients must not rely on that order.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub alias: String,
    pub total_clicks: u64,
    pub daily: BTreeMap<String, u64>,
    pub user_agent: BTreeMap<String, u64>,
}

impl From<AnalyticsSummary> for AnalyticsResponse {
    fn from(summary: AnalyticsSummary) -> Self {
        Self {
            alias: summary.alias,
            total_clicks: summary.total_clicks,
            daily: summary.daily.into_iter().collect(),
            user_agent: summary.user_agent.into_iter().collect(),
        }
    }
}
