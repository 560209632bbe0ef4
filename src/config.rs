use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("setting {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub account_service_url: String,
    pub max_connection_pooling: u32,
    pub port: u16,
    pub log_file: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Read settings from the environment, honoring a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // mandatory fields
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let account_service_url =
            lookup("ACCOUNT_SERVICE_URL").ok_or(ConfigError::Missing("ACCOUNT_SERVICE_URL"))?;

        // optional fields
        let max_connection_pooling = parse_or(&lookup, "MAX_CONNECTION_POOLING", 5)?;
        let port = parse_or(&lookup, "PORT", 3000)?;
        let log_file = lookup("LOG_FILE").unwrap_or("app.log".to_string());
        let http_timeout = Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?);

        Ok(Self {
            database_url,
            account_service_url,
            max_connection_pooling,
            port,
            log_file,
            http_timeout,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
