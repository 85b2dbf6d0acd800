// src/handlers/mod.rs

pub mod auth;
pub mod comments;
pub mod follows;
pub mod images;
pub mod interaction;
pub mod posts;
pub mod replies;
pub mod scheduler;
pub mod users;

use crate::error::AppError;

/// Only the author of a resource may change or remove it.
pub(crate) fn ensure_owner(owner_id: i64, user_id: i64, what: &str) -> Result<(), AppError> {
    if owner_id != user_id {
        return Err(AppError::Forbidden(format!(
            "You are not authorized to modify this {what}"
        )));
    }
    Ok(())
}
