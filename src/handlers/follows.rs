use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::follow::{CreateFollowRequest, Follow, FollowEntry, PageParams},
    utils::jwt::Claims,
};

/// Follow another user.
pub async fn create_follow(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateFollowRequest>,
) -> Result<impl IntoResponse, AppError> {
    let follower_id = claims.user_id()?;

    if payload.following_id == follower_id {
        return Err(AppError::BadRequest(
            "A user cannot follow themselves".to_string(),
        ));
    }

    sqlx::query("SELECT id FROM users WHERE id = $1")
        .bind(payload.following_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User to follow not found".to_string()))?;

    let follow = sqlx::query_as::<_, Follow>(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        RETURNING id, follower_id, following_id, created_at
        "#,
    )
    .bind(follower_id)
    .bind(payload.following_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Follow relationship already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Follow created successfully", "follow": follow })),
    ))
}

/// Remove a follow relationship the caller owns (as the follower).
pub async fn delete_follow(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM follows WHERE id = $1 AND follower_id = $2")
        .bind(id)
        .bind(claims.user_id()?)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Follow relationship not found".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Follow relationship deleted successfully" })))
}

/// Users following `id`.
pub async fn list_followers(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = params.resolve();

    let data = sqlx::query_as::<_, FollowEntry>(
        r#"
        SELECT f.follower_id AS user_id, u.username, f.created_at AS followed_at
        FROM follows f
        JOIN users u ON f.follower_id = u.id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC, f.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "data": data, "page": page, "limit": limit })))
}

/// Users that `id` follows.
pub async fn list_followings(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit, offset) = params.resolve();

    let data = sqlx::query_as::<_, FollowEntry>(
        r#"
        SELECT f.following_id AS user_id, u.username, f.created_at AS followed_at
        FROM follows f
        JOIN users u ON f.following_id = u.id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC, f.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "data": data, "page": page, "limit": limit })))
}
