//! Shared state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{DynAnalyticsService, DynLinkService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::cache::CacheService;

/// Handles to the services, the redirect cache and the click queue.
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub analytics_service: Arc<DynAnalyticsService>,
    pub cache: Arc<dyn CacheService>,
    /// Producer side of the click queue drained by
    /// [`crate::domain::click_worker::run_click_worker`].
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Whether client IPs may be taken from proxy headers.
    pub behind_proxy: bool,
}
