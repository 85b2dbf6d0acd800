// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, USER_COLUMNS, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it and returns a token,
/// so the client is logged in straight away.
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let sql = format!(
        r#"
        INSERT INTO users (full_name, username, email, password)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&payload.full_name)
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&hashed_password)
        .fetch_one(&pool)
        .await
        .map_err(|e| AppError::from_insert(e, "Username or email already exists"))?;

    let (token, exp) = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user,
            "token": token,
            "exp": exp,
        })),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown usernames and wrong passwords get the same answer.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&payload.username)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::from(e)
        })?
        .ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let (token, exp) = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": user,
        "token": token,
        "exp": exp,
    })))
}
