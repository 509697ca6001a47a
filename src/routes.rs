//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`                   - Create a short link
//! - `GET  /analytics/{alias}`         - Click summary
//! - `GET  /analytics/{alias}/clicks`  - Raw click listing
//! - `GET  /health`                    - Health check: store, cache, click queue
//! - `GET  /{alias}`                   - Redirect (records a click)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link creation
//! - **CORS** - Only when an allowed origin is configured
//! - **Path normalization** - Trailing slash trimmed

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// `cors_origin` is the browser origin allowed to call the API; `None`
/// disables CORS headers.
pub fn app_router(state: AppState, cors_origin: Option<&str>) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(api::routes::api_routes())
        .route("/health", get(health_handler))
        .route("/{alias}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer());

    let router = match cors::layer(cors_origin) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
