use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'replies' table: an answer to a comment.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub post_id: i64,
    pub comment_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Reply must be between 1 and 1000 characters"
    ))]
    pub content: String,
}

/// Reply joined with its author's username.
#[derive(Debug, Serialize, FromRow)]
pub struct ReplyResponse {
    pub id: i64,
    pub post_id: i64,
    pub comment_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
