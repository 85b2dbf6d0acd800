// src/config.rs

use std::{env, time::Duration};

use thiserror::Error;

/// 72 hours, the token lifetime when `JWT_EXPIRATION` is not set.
const DEFAULT_JWT_EXPIRATION: u64 = 72 * 60 * 60;
const DEFAULT_SCHEDULER_INTERVAL: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Allowed CORS origin.
    pub frontend_url: String,
    pub scheduler_enabled: bool,
    pub scheduler_interval_secs: u64,
}

impl Config {
    /// Loads configuration from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = parse_or("JWT_EXPIRATION", lookup("JWT_EXPIRATION"), DEFAULT_JWT_EXPIRATION)?;
        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let port = parse_or("PORT", lookup("PORT"), 3000u16)?;
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:8081".to_string());

        let scheduler_enabled = lookup("SCHEDULER_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let scheduler_interval_secs = parse_or(
            "SCHEDULER_INTERVAL_SECS",
            lookup("SCHEDULER_INTERVAL_SECS"),
            DEFAULT_SCHEDULER_INTERVAL,
        )?;
        if scheduler_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SCHEDULER_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            frontend_url,
            scheduler_enabled,
            scheduler_interval_secs,
        })
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler_interval_secs)
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
