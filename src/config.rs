use crate::constants::*;
use std::env;
use std::time::Duration;
use time::UtcOffset;
use time::macros::format_description;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub data_path: String,
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub lot_offset: UtcOffset,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidBaseUrl(String),
    InvalidTimeout(String),
    InvalidOffset(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort(port) => {
                write!(f, "Invalid port number: {}", port)
            }
            ConfigError::InvalidBaseUrl(url) => {
                write!(f, "API_BASE_URL must start with http:// or https://, got: {}", url)
            }
            ConfigError::InvalidTimeout(value) => {
                write!(f, "Invalid HTTP timeout in seconds: {}", value)
            }
            ConfigError::InvalidOffset(value) => {
                write!(f, "Invalid lot UTC offset (expected +HH:MM): {}", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Config pointing at `api_base_url` with every other setting at its default.
    pub fn new(api_base_url: &str) -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            api_base_url: normalize_base_url(api_base_url),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            lot_offset: UtcOffset::UTC,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("CONSOLE_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("CONSOLE_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let data_path = env::var("DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        if port.parse::<u16>().is_err() {
            return Err(ConfigError::InvalidPort(port));
        }

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(api_base_url));
        }

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let raw_offset =
            env::var("LOT_UTC_OFFSET").unwrap_or_else(|_| DEFAULT_LOT_UTC_OFFSET.to_string());
        let lot_offset = parse_offset(&raw_offset)?;

        Ok(Config {
            host,
            port,
            data_path,
            api_base_url: normalize_base_url(&api_base_url),
            http_timeout,
            lot_offset,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses offsets written as `+05:30` or `-04:00`.
pub fn parse_offset(raw: &str) -> Result<UtcOffset, ConfigError> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), &format).map_err(|_| ConfigError::InvalidOffset(raw.to_string()))
}

// Endpoint paths already start with "/api/..."
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
