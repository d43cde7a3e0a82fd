//! Background jobs.
//!
//! The only job samples connection pool gauges. It stops when the shutdown
//! channel flips to `true`.

use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// How often pool gauges are sampled.
pub const POOL_METRICS_PERIOD: Duration = Duration::from_secs(10);

/// Spawns the pool metrics sampler.
pub fn spawn_pool_metrics(
    pool: PgPool,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        info!(job = "pool_metrics", period_secs = period.as_secs(), "Job scheduled");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    persistence::metrics::record_pool_metrics(&pool);
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!(job = "pool_metrics", "Job shutting down");
                        break;
                    }
                }
            }
        }
    })
}
