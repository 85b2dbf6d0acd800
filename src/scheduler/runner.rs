//! Fixed-period background task that drives the publisher.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::publisher::Publisher;

/// Handle to the running timer task.
pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Token that stops the timer when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops taking ticks and waits for an in-flight sweep to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "scheduler task ended abnormally");
        }
    }
}

/// Spawns the timer. The first sweep runs one full `period` after start.
///
/// A sweep that overruns the period does not cause catch-up runs; the
/// missed ticks are dropped and the next sweep happens on the next period.
pub fn spawn(publisher: Arc<Publisher>, period: Duration, cancel: CancellationToken) -> SchedulerHandle {
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(period_secs = period.as_secs(), "scheduler started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // Not part of the select: a started sweep always runs to completion.
            publisher.publish_due_posts().await;
        }

        info!("scheduler stopped");
    });

    SchedulerHandle { cancel, task }
}
