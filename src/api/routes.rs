//! API route configuration.

use crate::api::handlers::{analytics_handler, clicks_handler, shorten_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes.
///
/// # Endpoints
///
/// - `POST /shorten`                   - Create a short link (rate limited)
/// - `GET  /analytics/{alias}`         - Click summary for a link
/// - `GET  /analytics/{alias}/clicks`  - Raw click events (paginated)
pub fn api_routes() -> Router<AppState> {
    let create = Router::new()
        .route("/shorten", post(shorten_handler))
        .layer(rate_limit::create_link_layer());

    Router::new()
        .merge(create)
        .route("/analytics/{alias}", get(analytics_handler))
        .route("/analytics/{alias}/clicks", get(clicks_handler))
}
