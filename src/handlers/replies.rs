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
    handlers::{comments::fetch_comment, ensure_owner, posts::fetch_published},
    models::reply::{Reply, ReplyRequest, ReplyResponse},
    utils::{jwt::Claims, sanitize::clean_text},
};

const REPLY_COLUMNS: &str = "id, post_id, comment_id, user_id, content, created_at, updated_at";

/// Reply to a comment. The reply inherits the comment's post.
pub async fn create_reply(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(comment_id): Path<i64>,
    Json(payload): Json<ReplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let comment = fetch_comment(&pool, comment_id).await?;

    let sql = format!(
        r#"
        INSERT INTO replies (post_id, comment_id, user_id, content)
        VALUES ($1, $2, $3, $4)
        RETURNING {REPLY_COLUMNS}
        "#
    );
    let reply = sqlx::query_as::<_, Reply>(&sql)
        .bind(comment.post_id)
        .bind(comment.id)
        .bind(user_id)
        .bind(clean_text(&payload.content))
        .fetch_one(&pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reply created successfully", "reply": reply })),
    ))
}

/// All replies on a post, grouped by comment.
pub async fn list_replies_for_post(
    State(pool): State<PgPool>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_published(&pool, post_id).await?;

    let replies = replies_for_post(&pool, post_id).await?;

    Ok(Json(json!({ "replies": replies })))
}

/// Replies on a post with author usernames, grouped by comment.
pub(crate) async fn replies_for_post(
    pool: &PgPool,
    post_id: i64,
) -> Result<Vec<ReplyResponse>, AppError> {
    let replies = sqlx::query_as::<_, ReplyResponse>(
        r#"
        SELECT
            r.id, r.post_id, r.comment_id, r.user_id, u.username,
            r.content, r.created_at
        FROM replies r
        JOIN users u ON r.user_id = u.id
        WHERE r.post_id = $1
        ORDER BY r.comment_id ASC, r.created_at ASC, r.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(replies)
}

pub async fn update_reply(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<ReplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let existing = fetch_reply(&pool, id).await?;
    ensure_owner(existing.user_id, claims.user_id()?, "reply")?;

    let sql = format!(
        r#"
        UPDATE replies SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {REPLY_COLUMNS}
        "#
    );
    let reply = sqlx::query_as::<_, Reply>(&sql)
        .bind(clean_text(&payload.content))
        .bind(id)
        .fetch_one(&pool)
        .await?;

    Ok(Json(json!({ "message": "Reply updated successfully", "reply": reply })))
}

pub async fn delete_reply(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let existing = fetch_reply(&pool, id).await?;
    ensure_owner(existing.user_id, claims.user_id()?, "reply")?;

    sqlx::query("DELETE FROM replies WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Reply deleted successfully" })))
}

async fn fetch_reply(pool: &PgPool, id: i64) -> Result<Reply, AppError> {
    let sql = format!("SELECT {REPLY_COLUMNS} FROM replies WHERE id = $1");
    sqlx::query_as::<_, Reply>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Reply not found".to_string()))
}
