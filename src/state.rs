use std::sync::Arc;

use crate::{config::Config, scheduler::Publisher};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub publisher: Arc<Publisher>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<Publisher> {
    fn from_ref(state: &AppState) -> Self {
        state.publisher.clone()
    }
}
