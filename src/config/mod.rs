//! Configuration management for the Costumerie client
//!
//! This module handles loading and validating configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_STATE_DIR: &str = ".costumerie";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix for every API path, without a trailing slash
    pub api_base_url: String,

    /// Directory holding the persisted token store
    pub state_dir: PathBuf,

    /// Per-request timeout; `None` leaves requests unbounded
    pub http_timeout: Option<Duration>,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            http_timeout: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let api_base_url = normalize_base_url(
            &env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )?;

        let state_dir = env::var("STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR));

        let http_timeout = match env::var("HTTP_TIMEOUT_SECONDS") {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_base_url,
            state_dir,
            http_timeout,
            log_level,
        })
    }

    /// Same configuration pointed at another backend
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Full URL for an API path such as `/costumes/3`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            ConfigError::InvalidBaseUrl(format!(
                "'{}' must start with http:// or https://",
                raw
            ))
        })?;
    if rest.trim_end_matches('/').is_empty() {
        return Err(ConfigError::InvalidBaseUrl(format!("'{}' has no host", raw)));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let seconds = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidTimeout(format!("'{}' is not a whole number", raw)))?;
    if seconds == 0 {
        return Err(ConfigError::InvalidTimeout(
            "HTTP_TIMEOUT_SECONDS must be greater than 0".to_string(),
        ));
    }
    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_ignores_deployment_stage() {
        std::env::set_var("ENVIRONMENT", "not-a-stage");
        let config = Config::from_env();
        std::env::remove_var("ENVIRONMENT");
        assert!(config.is_ok());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url(" http://10.0.2.2:8000/api/ ").unwrap(),
            "http://10.0.2.2:8000/api"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com").unwrap(),
            "https://api.example.com"
        );
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(normalize_base_url("localhost:8000").is_err());
        assert!(normalize_base_url("http://").is_err());
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = Config::default()
            .with_base_url("http://localhost:8000/api/")
            .unwrap();
        assert_eq!(
            config.endpoint("/costumes/3"),
            "http://localhost:8000/api/costumes/3"
        );
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("30").unwrap(), Duration::from_secs(30));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidBaseUrl("nope".to_string());
        assert!(err.to_string().contains("nope"));
    }
}
