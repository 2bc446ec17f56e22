//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chrono::Duration;
use fake_data_core::Limits;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Enables the Postgres page mirror when set.
    pub database_url: Option<String>,
    pub session_ttl: Duration,
    pub sweep_interval: std::time::Duration,
    pub archive_ttl: Duration,
    pub max_total_records: u64,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            database_url: None,
            session_ttl: Duration::minutes(10),
            sweep_interval: std::time::Duration::from_secs(60),
            archive_ttl: Duration::hours(1),
            max_total_records: 1_000_000,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = parse_or(&lookup, "BIND_ADDRESS", defaults.bind_address)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let cors_origin = lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        // --- Session and Mirror Lifetimes ---
        let session_ttl_secs = parse_or(&lookup, "SESSION_TTL_SECS", 600_i64)?;
        let sweep_interval_secs = parse_or(&lookup, "SWEEP_INTERVAL_SECS", 60_u64)?;
        let archive_ttl_secs = parse_or(&lookup, "ARCHIVE_TTL_SECS", 3600_i64)?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be positive".to_string(),
            ));
        }
        if sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SWEEP_INTERVAL_SECS".to_string(),
                "must be positive".to_string(),
            ));
        }

        // --- Generation Limits ---
        let max_total_records = parse_or(&lookup, "MAX_TOTAL_RECORDS", defaults.max_total_records)?;

        Ok(Self {
            bind_address,
            log_level,
            database_url,
            session_ttl: Duration::seconds(session_ttl_secs),
            sweep_interval: std::time::Duration::from_secs(sweep_interval_secs),
            archive_ttl: Duration::seconds(archive_ttl_secs),
            max_total_records,
            cors_origin,
        })
    }
}

impl Config {
    /// Generation limits, with the configured record ceiling applied.
    pub fn limits(&self) -> Limits {
        Limits {
            max_total_records: self.max_total_records,
            ..Limits::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
