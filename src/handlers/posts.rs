use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::{comments::comments_for_post, ensure_owner, replies::replies_for_post},
    models::{
        comment::CommentThread,
        post::{
            CreatePostRequest, FeedPost, NewPost, POST_COLUMNS, Post, PostDetail, PostListParams,
            PostStatus, UpdatePostRequest,
        },
    },
    utils::{jwt::Claims, sanitize::clean_text},
};

/// Create a new post.
///
/// Published right away unless `scheduled_at` is in the future (then
/// `scheduled`) or `draft` is set.
pub async fn create_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let new_post = payload.into_new_post(claims.user_id()?, Utc::now());

    let post = insert_post(&pool, new_post).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "post": post })),
    ))
}

/// Create a post for a given time. `scheduled_at` is mandatory here; a time
/// that has already passed publishes immediately.
pub async fn create_scheduled_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.scheduled_at.is_none() {
        return Err(AppError::BadRequest("Scheduled time is required".to_string()));
    }
    let new_post = payload.into_new_post(claims.user_id()?, Utc::now());

    let post = insert_post(&pool, new_post).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Scheduled post created successfully", "post": post })),
    ))
}

async fn insert_post(pool: &PgPool, new_post: NewPost) -> Result<Post, AppError> {
    let sql = format!(
        r#"
        INSERT INTO posts (
            user_id, caption, description, image_url, scheduled_at, status,
            allow_comments, hide_like_counts, is_private, is_scheduled
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {POST_COLUMNS}
        "#
    );

    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(new_post.user_id)
        .bind(clean_text(&new_post.caption))
        .bind(clean_text(&new_post.description))
        .bind(&new_post.image_url)
        .bind(new_post.scheduled_at)
        .bind(new_post.status.as_str())
        .bind(new_post.allow_comments)
        .bind(new_post.hide_like_counts)
        .bind(new_post.is_private)
        .bind(new_post.status == PostStatus::Scheduled)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create post: {:?}", e);
            AppError::from(e)
        })?;

    tracing::info!(
        post_id = post.id,
        status = %post.status,
        scheduled_at = ?post.scheduled_at,
        "post created"
    );

    Ok(post)
}

/// Feed columns: the post row, its author and counters.
const FEED_SELECT: &str = r#"
    SELECT
        p.*,
        u.username,
        CASE WHEN p.hide_like_counts THEN NULL
             ELSE (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id)
        END AS like_count,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON p.user_id = u.id
"#;

/// Feed of published posts for infinite scroll (`id > last_post_id`).
pub async fn list_posts(
    State(pool): State<PgPool>,
    Query(params): Query<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    let last_post_id = params.last_post_id.unwrap_or(0);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);

    let sql = format!(
        "{FEED_SELECT} WHERE p.status = 'published' AND p.id > $1 ORDER BY p.id ASC LIMIT $2"
    );
    let posts = sqlx::query_as::<_, FeedPost>(&sql)
        .bind(last_post_id)
        .bind(limit)
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list posts: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(json!({ "posts": posts })))
}

/// A published post with its author, counters and comment threads.
pub async fn get_post(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let sql = format!("{FEED_SELECT} WHERE p.id = $1 AND p.status = 'published'");
    let post = sqlx::query_as::<_, FeedPost>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let comments = comments_for_post(&pool, id).await?;
    let replies = replies_for_post(&pool, id).await?;

    Ok(Json(PostDetail {
        post,
        comments: CommentThread::nest(comments, replies),
    }))
}

/// All of the caller's posts, including drafts and scheduled ones.
pub async fn list_my_posts(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let sql = format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    );
    let posts = sqlx::query_as::<_, Post>(&sql)
        .bind(claims.user_id()?)
        .fetch_all(&pool)
        .await?;

    Ok(Json(posts))
}

/// Update content fields of a post. Author only.
pub async fn update_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let existing = fetch_any(&pool, id).await?;
    ensure_owner(existing.user_id, claims.user_id()?, "post")?;

    let sql = format!(
        r#"
        UPDATE posts SET
            caption = COALESCE($1, caption),
            description = COALESCE($2, description),
            image_url = COALESCE($3, image_url),
            allow_comments = COALESCE($4, allow_comments),
            hide_like_counts = COALESCE($5, hide_like_counts),
            is_private = COALESCE($6, is_private),
            updated_at = NOW()
        WHERE id = $7
        RETURNING {POST_COLUMNS}
        "#
    );
    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(payload.caption.as_deref().map(clean_text))
        .bind(payload.description.as_deref().map(clean_text))
        .bind(&payload.image_url)
        .bind(payload.allow_comments)
        .bind(payload.hide_like_counts)
        .bind(payload.is_private)
        .bind(id)
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update post: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(json!({ "message": "Post updated successfully", "post": post })))
}

/// Delete a post. Author only.
pub async fn delete_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = fetch_any(&pool, id).await?;
    ensure_owner(post.user_id, claims.user_id()?, "post")?;

    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete post: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(json!({ "message": "Post deleted successfully" })))
}

/// Loads a post in any status.
pub(crate) async fn fetch_any(pool: &PgPool, id: i64) -> Result<Post, AppError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
    sqlx::query_as::<_, Post>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))
}

/// Loads a post visible to everyone. Drafts and scheduled posts are 404.
pub(crate) async fn fetch_published(pool: &PgPool, id: i64) -> Result<Post, AppError> {
    let post = fetch_any(pool, id).await?;
    if post.status != PostStatus::Published {
        return Err(AppError::NotFound("Post not found".to_string()));
    }
    Ok(post)
}
