//! Handlers for per-alias analytics.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::dto::clicks::{ClickInfo, ClickListResponse};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click summary for an alias.
///
/// # Endpoint
///
/// `GET /analytics/{alias}`
///
/// # Response
///
/// ```json
/// {
///   "alias": "go2",
///   "total_clicks": 2,
///   "daily": { "2024-05-01": 1, "2024-05-02": 1 },
///   "user_agent": { "curl/8.0": 2 }
/// }
/// ```
///
/// Days are UTC calendar days. A link without clicks returns zero totals and
/// empty maps.
///
/// # Errors
///
/// Returns 404 Not Found if the alias is unknown or retired.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let summary = state.analytics_service.summarize(&alias).await?;

    Ok(Json(summary.into()))
}

/// Lists raw click events for an alias, newest first.
///
/// # Endpoint
///
/// `GET /analytics/{alias}/clicks?page=1&page_size=25`
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are malformed or out of range.
/// Returns 404 Not Found if the alias is unknown or retired.
pub async fn clicks_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<ClickListResponse>, AppError> {
    let Query(params) = params?;
    let (offset, limit) = params.validate_and_get_offset_limit()?;

    let page = state
        .analytics_service
        .list_clicks(&alias, offset, limit)
        .await?;

    Ok(Json(ClickListResponse {
        pagination: PaginationMeta::new(params.page(), params.page_size(), page.total),
        items: page.items.into_iter().map(ClickInfo::from).collect(),
    }))
}
