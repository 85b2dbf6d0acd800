use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::ensure_owner,
    models::user::{USER_COLUMNS, UpdateUserRequest, User},
    utils::{hash::hash_password, jwt::Claims, sanitize::clean_text},
};

/// Lists all users, newest first.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id DESC");
    let users = sqlx::query_as::<_, User>(&sql)
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(users))
}

pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates the caller's own account. Absent fields are left unchanged.
pub async fn update_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_owner(id, claims.user_id()?, "user")?;

    let password = payload.password.as_deref().map(hash_password).transpose()?;
    let bio = payload.bio.as_deref().map(clean_text);

    let sql = format!(
        r#"
        UPDATE users SET
            full_name = COALESCE($1, full_name),
            username = COALESCE($2, username),
            email = COALESCE($3, email),
            bio = COALESCE($4, bio),
            profile_image = COALESCE($5, profile_image),
            password = COALESCE($6, password),
            updated_at = NOW()
        WHERE id = $7
        RETURNING {USER_COLUMNS}
        "#
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&payload.full_name)
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&bio)
        .bind(&payload.profile_image)
        .bind(&password)
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| AppError::from_insert(e, "Username or email already exists"))?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes the caller's own account (posts, comments and follows cascade).
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_owner(id, claims.user_id()?, "user")?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
