//! Background worker that records redirect clicks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Drains click events and records them with bounded concurrency.
///
/// Transient store failures are retried with jittered exponential backoff.
/// The worker exits once every sender is dropped and all in-flight
/// recordings have finished.
pub async fn run_click_worker<L, C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    service: Arc<ClickService<L, C>>,
    concurrency: usize,
) where
    L: LinkRepository + ?Sized + 'static,
    C: ClickRepository + ?Sized + 'static,
{
    let limiter = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };

        let service = service.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            record_with_retry(&service, event).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    info!("Click worker stopped");
}

async fn record_with_retry<L, C>(service: &ClickService<L, C>, event: ClickEvent)
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        || service.record(&event),
        AppError::is_transient,
    )
    .await;

    match result {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(alias = %click.alias, id = %click.id, "Click recorded");
        }
        Err(AppError::NotFound { .. }) => {
            metrics::counter!("clicks_discarded_total").increment(1);
            debug!(alias = %event.alias, "Link vanished before click was recorded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            error!(alias = %event.alias, error = %e, "Failed to record click");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Click, NewClick, NewLink};
    use crate::infrastructure::persistence::MemoryStore;
    use async_trait::async_trait;
    use futures::stream::BoxStream;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Commits through the inner store, then stalls past the store timeout
    /// on the first append only.
    struct SlowAfterCommit {
        inner: Arc<MemoryStore>,
        stalled: AtomicBool,
    }

    #[async_trait]
    impl ClickRepository for SlowAfterCommit {
        async fn append(&self, new_click: NewClick) -> Result<Click, AppError> {
            let click = self.inner.append(new_click).await?;
            if !self.stalled.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Ok(click)
        }

        fn stream_by_alias(&self, alias: &str) -> BoxStream<'static, Result<Click, AppError>> {
            self.inner.stream_by_alias(alias)
        }

        async fn list_by_alias(
            &self,
            alias: &str,
            offset: i64,
            limit: i64,
        ) -> Result<Vec<Click>, AppError> {
            self.inner.list_by_alias(alias, offset, limit).await
        }

        async fn count_by_alias(&self, alias: &str) -> Result<i64, AppError> {
            self.inner.count_by_alias(alias).await
        }
    }

    #[tokio::test]
    async fn test_worker_records_all_events_then_stops() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewLink {
                url: "https://example.com/".to_string(),
                alias: "go2".to_string(),
            })
            .await
            .unwrap();

        let service = Arc::new(ClickService::new(
            store.clone(),
            store.clone(),
            Duration::from_secs(1),
        ));
        let (tx, rx) = mpsc::channel(100);
        let worker = tokio::spawn(run_click_worker(rx, service, 4));

        for i in 0..20 {
            tx.send(ClickEvent::new(
                "go2".to_string(),
                Some("TestBot/1.0"),
                format!("10.0.0.{i}"),
            ))
            .await
            .unwrap();
        }
        tx.send(ClickEvent::new(
            "missing".to_string(),
            None,
            "10.0.0.99".to_string(),
        ))
        .await
        .unwrap();
        drop(tx);

        worker.await.unwrap();

        assert_eq!(store.count_by_alias("go2").await.unwrap(), 20);
        assert_eq!(store.count_by_alias("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_timed_out_append_that_committed_is_not_duplicated() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewLink {
                url: "https://example.com/".to_string(),
                alias: "go2".to_string(),
            })
            .await
            .unwrap();

        let clicks = Arc::new(SlowAfterCommit {
            inner: store.clone(),
            stalled: AtomicBool::new(false),
        });
        let service = Arc::new(ClickService::new(
            store.clone(),
            clicks,
            Duration::from_millis(50),
        ));
        let (tx, rx) = mpsc::channel(1);
        let worker = tokio::spawn(run_click_worker(rx, service, 1));

        tx.send(ClickEvent::new(
            "go2".to_string(),
            Some("curl/8.0"),
            "10.0.0.1".to_string(),
        ))
        .await
        .unwrap();
        drop(tx);

        worker.await.unwrap();

        assert_eq!(store.count_by_alias("go2").await.unwrap(), 1);
    }
}
