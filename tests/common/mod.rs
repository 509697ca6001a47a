#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, routing::get};
use linktrack::api::handlers::{health_handler, redirect_handler};
use linktrack::api::routes::api_routes;
use linktrack::application::services::DynClickService;
use linktrack::config::{Config, StoreBackend};
use linktrack::domain::click_event::ClickEvent;
use linktrack::infrastructure::cache::NullCache;
use linktrack::server::{Stores, build_state};
use linktrack::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const PEER: &str = "127.0.0.1:12345";

pub fn memory_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        click_queue_capacity: 100,
        ..Config::default()
    }
}

/// State over a fresh in-memory store, plus the worker side of the click queue.
pub fn create_test_state() -> (AppState, Arc<DynClickService>, mpsc::Receiver<ClickEvent>) {
    build_state(
        Stores::memory(),
        Arc::new(NullCache::new()),
        &memory_config(),
    )
}

/// Every route of the service, with a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .route("/health", get(health_handler))
        .route("/{alias}", get(redirect_handler))
        .with_state(state)
        .layer(MockConnectInfoLayer)
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
