use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::{ensure_owner, posts::fetch_published},
    models::comment::{Comment, CommentRequest, CommentResponse},
    utils::{jwt::Claims, sanitize::clean_text},
};

const COMMENT_COLUMNS: &str = "id, post_id, user_id, content, created_at, updated_at";

/// Create a new comment on a published post.
pub async fn create_comment(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let post = fetch_published(&pool, post_id).await?;
    if !post.allow_comments {
        return Err(AppError::Forbidden(
            "Comments are disabled for this post".to_string(),
        ));
    }

    let sql = format!(
        r#"
        INSERT INTO comments (post_id, user_id, content)
        VALUES ($1, $2, $3)
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let comment = sqlx::query_as::<_, Comment>(&sql)
        .bind(post_id)
        .bind(user_id)
        .bind(clean_text(&payload.content))
        .fetch_one(&pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment created successfully", "comment": comment })),
    ))
}

/// List all comments for a post, oldest first.
pub async fn list_comments(
    State(pool): State<PgPool>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_published(&pool, post_id).await?;

    Ok(Json(comments_for_post(&pool, post_id).await?))
}

/// Comments on a post with author usernames, oldest first.
pub(crate) async fn comments_for_post(
    pool: &PgPool,
    post_id: i64,
) -> Result<Vec<CommentResponse>, AppError> {
    let comments = sqlx::query_as::<_, CommentResponse>(
        r#"
        SELECT
            c.id, c.post_id, c.user_id, u.username, c.content,
            c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON c.user_id = u.id
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

pub async fn update_comment(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let existing = fetch_comment(&pool, id).await?;
    ensure_owner(existing.user_id, claims.user_id()?, "comment")?;

    let sql = format!(
        r#"
        UPDATE comments SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let comment = sqlx::query_as::<_, Comment>(&sql)
        .bind(clean_text(&payload.content))
        .bind(id)
        .fetch_one(&pool)
        .await?;

    Ok(Json(json!({ "message": "Comment updated successfully", "comment": comment })))
}

/// Deletes a comment and its replies.
pub async fn delete_comment(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let existing = fetch_comment(&pool, id).await?;
    ensure_owner(existing.user_id, claims.user_id()?, "comment")?;

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}

pub(crate) async fn fetch_comment(pool: &PgPool, id: i64) -> Result<Comment, AppError> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
    sqlx::query_as::<_, Comment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Comment not found".to_string()))
}
