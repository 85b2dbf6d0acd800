use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    handlers::posts::fetch_published,
    models::{
        interaction::{Like, Save},
        post::Post,
    },
    utils::jwt::Claims,
};

/// Like a published post. A second like from the same user is a 409.
pub async fn like_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    fetch_published(&pool, post_id).await?;

    let like = sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO post_likes (user_id, post_id)
        VALUES ($1, $2)
        RETURNING id, user_id, post_id, created_at
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Like already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Like created successfully", "like": like })),
    ))
}

/// Remove the caller's like from a post.
pub async fn unlike_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
        .bind(claims.user_id()?)
        .bind(post_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Like not found".to_string()));
    }

    Ok(Json(json!({ "message": "Like deleted successfully" })))
}

/// Bookmark a published post for later.
pub async fn save_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    fetch_published(&pool, post_id).await?;

    let save = sqlx::query_as::<_, Save>(
        r#"
        INSERT INTO post_saves (user_id, post_id)
        VALUES ($1, $2)
        RETURNING id, user_id, post_id, created_at
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Save already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post saved successfully", "save": save })),
    ))
}

pub async fn unsave_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM post_saves WHERE user_id = $1 AND post_id = $2")
        .bind(claims.user_id()?)
        .bind(post_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Save not found".to_string()));
    }

    Ok(Json(json!({ "message": "Save deleted successfully" })))
}

/// Posts saved by the current user, most recently saved first.
pub async fn list_my_saves(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.*
        FROM post_saves s
        JOIN posts p ON s.post_id = p.id
        WHERE s.user_id = $1 AND p.status = 'published'
        ORDER BY s.created_at DESC, s.id DESC
        "#,
    )
    .bind(claims.user_id()?)
    .fetch_all(&pool)
    .await?;

    Ok(Json(posts))
}
