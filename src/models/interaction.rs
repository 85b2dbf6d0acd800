use serde::Serialize;
use sqlx::FromRow;

/// Row in 'post_likes'.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Row in 'post_saves'.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Save {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
