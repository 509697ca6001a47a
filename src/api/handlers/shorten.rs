//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "alias": "go2" }
/// ```
///
/// `alias` is optional; when absent a random one is generated.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": "7b0e6f3c-2a8e-4b8e-9c57-1f0c3d2b9a10",
///   "url": "https://example.com/",
///   "alias": "go2",
///   "createdAt": "2024-05-01T09:30:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is malformed, the URL is invalid or the alias is malformed
/// - 409 if the requested alias is already taken
/// - 500 if no free alias could be generated
/// - 503 if the store is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.alias)
        .await?;

    Ok((StatusCode::CREATED, Json(ShortenResponse::from(link))))
}
