//! Recurring background task that triggers rotation batches.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::application::services::BatchSummary;
use crate::error::AppError;

/// One unit of scheduled work. Implemented by the rotation service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RotationJob: Send + Sync {
    async fn run_once(&self) -> Result<BatchSummary, AppError>;
}

/// Runs `job` every `period` until `shutdown` flips to `true` or its sender is
/// dropped.
///
/// The first batch starts one full period after the worker starts. Ticks
/// missed while a batch was still running are skipped, not replayed.
pub async fn run_rotation_worker<J>(job: Arc<J>, period: Duration, mut shutdown: watch::Receiver<bool>)
where
    J: RotationJob + ?Sized,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval_secs = period.as_secs(), "Rotation scheduler started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match job.run_once().await {
                    Ok(summary) => tracing::info!(
                        processed = summary.results.len(),
                        succeeded = summary.succeeded(),
                        failed = summary.failed(),
                        skipped = summary.skipped.len(),
                        "Scheduled rotation completed"
                    ),
                    Err(e) => tracing::error!(error = %e, "Scheduled rotation failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Rotation scheduler stopped");
}

pub fn spawn_rotation_worker<J>(
    job: Arc<J>,
    period: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    J: RotationJob + ?Sized + 'static,
{
    tokio::spawn(run_rotation_worker(job, period, shutdown))
}
