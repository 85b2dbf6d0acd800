//! Scheduled publication: moves due posts from `scheduled` to `published`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::store::PostStore;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Posts matched by the due-post query.
    pub due: usize,
    pub published: usize,
    /// Due posts that were no longer scheduled when we tried to publish them.
    pub skipped: usize,
    /// IDs whose write failed; they stay scheduled for the next sweep.
    pub failed: Vec<i64>,
    /// The due-post query itself failed and nothing was attempted.
    pub aborted: bool,
}

impl SweepReport {
    pub fn aborted() -> Self {
        Self {
            aborted: true,
            ..Self::default()
        }
    }
}

/// Publishes every due post through an injected [`PostStore`].
pub struct Publisher {
    store: Arc<dyn PostStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Runs one sweep against the current UTC time.
    pub async fn publish_due_posts(&self) -> SweepReport {
        self.publish_due_posts_at(Utc::now()).await
    }

    /// Runs one sweep treating `now` as the current time.
    ///
    /// A failed query aborts the sweep without touching any post. A failed
    /// write only affects that post; the loop moves on.
    pub async fn publish_due_posts_at(&self, now: DateTime<Utc>) -> SweepReport {
        info!(%now, "running scheduled post sweep");

        let due = match self.store.find_due(now).await {
            Ok(due) => due,
            Err(e) => {
                error!(error = %e, "failed to fetch scheduled posts");
                return SweepReport::aborted();
            }
        };

        let mut report = SweepReport {
            due: due.len(),
            ..SweepReport::default()
        };
        info!(due = report.due, "posts to publish");

        for post in &due {
            debug!(post_id = post.id, scheduled_at = ?post.scheduled_at, "publishing post");

            match self.store.publish(post).await {
                Ok(true) => {
                    report.published += 1;
                    info!(post_id = post.id, "post published");
                }
                Ok(false) => {
                    report.skipped += 1;
                    debug!(post_id = post.id, "post already left the scheduled state");
                }
                Err(e) => {
                    report.failed.push(post.id);
                    error!(post_id = post.id, error = %e, "failed to publish post");
                }
            }
        }

        if !report.failed.is_empty() {
            info!(
                published = report.published,
                failed = report.failed.len(),
                "sweep finished with failures"
            );
        }

        report
    }
}
