//! Post Store: the persistence seam the publisher depends on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::models::post::{POST_COLUMNS, Post};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("post store unavailable: {0}")]
    Unavailable(String),
}

/// Read and conditional-write access to post records.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts with `status = scheduled` and `scheduled_at <= now`.
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Post>, StoreError>;

    /// Moves `post` to `published` only if it is still `scheduled`.
    ///
    /// Returns `false` when the row was no longer scheduled (another sweep won).
    async fn publish(&self, post: &Post) -> Result<bool, StoreError>;
}

/// Postgres-backed store sharing the application pool.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Post>, StoreError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE status = 'scheduled'
              AND scheduled_at <= $1
            ORDER BY scheduled_at ASC, id ASC
            "#
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn publish(&self, post: &Post) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET status = 'published', updated_at = NOW()
            WHERE id = $1 AND status = 'scheduled'
            "#,
        )
        .bind(post.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
