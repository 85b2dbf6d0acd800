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
    handlers::{
        ensure_owner,
        posts::{fetch_any, fetch_published},
    },
    models::image::{Image, ImageRequest},
    utils::jwt::Claims,
};

/// Attach an image to one of the caller's posts.
///
/// Works for drafts and scheduled posts too, so a post can be assembled
/// before it goes live.
pub async fn upload_image(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(payload): Json<ImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let post = fetch_any(&pool, post_id).await?;
    ensure_owner(post.user_id, user_id, "post")?;

    let image = sqlx::query_as::<_, Image>(
        r#"
        INSERT INTO images (post_id, user_id, image_url)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, user_id, image_url, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(&payload.image_url)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save image: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(post_id, image_id = image.id, "image attached");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Image uploaded successfully", "image": image })),
    ))
}

/// Images of a published post, oldest first.
pub async fn list_images(
    State(pool): State<PgPool>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_published(&pool, post_id).await?;

    let images = sqlx::query_as::<_, Image>(
        r#"
        SELECT id, post_id, user_id, image_url, created_at, updated_at
        FROM images
        WHERE post_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "images": images })))
}
