//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::{
    AliasPolicy, AnalyticsService, ClickService, DynClickService, LinkService,
};
use crate::config::{Config, StoreBackend};
use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryStore, PgClickRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// How long shutdown waits for queued clicks to be recorded.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Repository handles for the selected backend.
pub struct Stores {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

impl Stores {
    /// Process-local store; both handles share one [`MemoryStore`].
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            links: store.clone(),
            clicks: store,
        }
    }

    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool)),
        }
    }
}

/// Connects to PostgreSQL with the configured pool settings.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Connects to the selected backend and applies migrations when needed.
async fn open_stores(config: &Config) -> Result<Stores> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Stores::memory())
        }
        StoreBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");

            Ok(Stores::postgres(Arc::new(pool)))
        }
    }
}

/// Connects to Redis when configured, falling back to [`NullCache`].
async fn open_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Wires services, state and the click worker over a set of stores.
///
/// Returns the state for the router and the click service the worker needs.
pub fn build_state(
    stores: Stores,
    cache: Arc<dyn CacheService>,
    config: &Config,
) -> (AppState, Arc<DynClickService>, mpsc::Receiver<ClickEvent>) {
    let timeout = config.store_timeout();
    let policy = AliasPolicy {
        length: config.alias_length,
        max_attempts: config.alias_max_attempts,
    };

    let link_service = Arc::new(LinkService::new(stores.links.clone(), policy, timeout));
    let click_service = Arc::new(ClickService::new(
        stores.links.clone(),
        stores.clicks.clone(),
        timeout,
    ));
    let analytics_service = Arc::new(AnalyticsService::new(stores.links, stores.clicks, timeout));

    let (click_sender, click_rx) = mpsc::channel(config.click_queue_capacity);

    let state = AppState {
        link_service,
        analytics_service,
        cache,
        click_sender,
        behind_proxy: config.behind_proxy,
    };

    (state, click_service, click_rx)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and click store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = open_stores(&config).await?;
    let cache = open_cache(&config).await;

    let (state, click_service, click_rx) = build_state(stores, cache, &config);

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        click_service,
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let app = app_router(state, config.cors_allowed_origin.as_deref());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router, and with it the last click sender, is gone; the worker
    // finishes what is queued and exits.
    tracing::info!("Draining click queue");
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await.is_err() {
        tracing::warn!("Click worker did not drain in time; pending clicks are lost");
    }

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
