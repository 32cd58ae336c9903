use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::task::JoinHandle;

use crate::application::ports::{JobRepository, RepositoryError};

/// Evicts terminal jobs whose last update is older than `retention`.
pub async fn evict_expired_jobs(
    job_repository: &dyn JobRepository,
    retention: Duration,
) -> Result<usize, RepositoryError> {
    let Ok(window) = TimeDelta::from_std(retention) else {
        return Ok(0);
    };
    let Some(cutoff) = Utc::now().checked_sub_signed(window) else {
        return Ok(0);
    };
    job_repository.evict_terminal_before(cutoff).await
}

/// Periodically runs [`evict_expired_jobs`] until the returned task is aborted.
pub fn spawn_retention_sweeper(
    job_repository: Arc<dyn JobRepository>,
    retention: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(
            retention_secs = retention.as_secs(),
            interval_secs = interval.as_secs(),
            "Job retention sweeper started"
        );
        let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match evict_expired_jobs(job_repository.as_ref(), retention).await {
                Ok(0) => {}
                Ok(evicted) => tracing::info!(evicted, "Evicted expired jobs"),
                Err(e) => tracing::warn!(error = %e, "Job eviction failed"),
            }
        }
    })
}
