use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::scheduler::Publisher;

/// Runs one publication sweep on the request task.
///
/// Always answers 200 once the sweep returns; per-post failures only show up
/// in the logs.
pub async fn trigger_scheduler(State(publisher): State<Arc<Publisher>>) -> impl IntoResponse {
    let report = publisher.publish_due_posts().await;

    tracing::info!(
        due = report.due,
        published = report.published,
        skipped = report.skipped,
        failed = report.failed.len(),
        aborted = report.aborted,
        "manual scheduler trigger finished"
    );

    Json(json!({ "message": "Scheduler triggered successfully" }))
}
