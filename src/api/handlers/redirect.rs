//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

use crate::application::services::DynLinkService;
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::cache::CacheService;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;

/// Redirects an alias to its target URL and records the click.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Request Flow
///
/// 1. Check cache for the target URL
/// 2. On cache miss, resolve the link and fill the cache in the background
/// 3. Capture a click event stamped with the server clock
/// 4. Hand the event to the background worker
/// 5. Return `302 Found`
///
/// # Click Tracking
///
/// Click events go through a bounded channel. If the queue is full the click
/// is dropped with a warning; the redirect itself never waits on recording.
///
/// # Errors
///
/// Returns 404 Not Found if the alias is unknown or retired.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let target = match state.cache.get_target(&alias).await {
        Ok(Some(cached)) => cached,
        Ok(None) => {
            let link = state.link_service.resolve(&alias).await?;

            tokio::spawn(fill_cache(
                state.cache.clone(),
                state.link_service.clone(),
                alias.clone(),
                link.url.clone(),
            ));

            link.url
        }
        Err(e) => {
            error!(error = %e, "Cache error, falling back to store");
            state.link_service.resolve(&alias).await?.url
        }
    };

    // Header bytes outside visible ASCII are kept, not discarded.
    let user_agent = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()));

    let event = ClickEvent::new(
        alias,
        user_agent.as_deref(),
        extract_client_ip(&headers, peer, state.behind_proxy),
    );

    match state.click_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!(alias = %event.alias, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            debug!(alias = %event.alias, "Click queue closed, dropping click");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, target)]))
}

/// Caches `alias -> url`, then drops the entry again if the link was retired
/// while the set was in flight.
async fn fill_cache(
    cache: Arc<dyn CacheService>,
    link_service: Arc<DynLinkService>,
    alias: String,
    url: String,
) {
    if let Err(e) = cache.set_target(&alias, &url, None).await {
        error!(alias = %alias, error = %e, "Failed to cache target");
        return;
    }

    if let Err(e) = link_service.resolve(&alias).await {
        debug!(alias = %alias, error = %e, "Link no longer resolvable, dropping cache entry");
        if let Err(e) = cache.invalidate(&alias).await {
            error!(alias = %alias, error = %e, "Failed to invalidate cache entry");
        }
    }
}
