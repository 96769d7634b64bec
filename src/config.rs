use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "todo-client.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TODO_API_URL must be an absolute http(s) url, got {0:?}")]
    ApiUrl(String),
    #[error("TODO_API_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    Timeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    /// `None` means requests never time out.
    pub request_timeout: Option<Duration>,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Reads the process environment, after `.env` has been loaded by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("TODO_API_URL")
            .or_else(|| option_env!("TODO_API_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().to_string();
        let scheme_ok = reqwest::Url::parse(&api_url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !scheme_ok {
            return Err(ConfigError::ApiUrl(api_url));
        }

        let request_timeout = match lookup("TODO_API_TIMEOUT_SECS") {
            None => Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => return Err(ConfigError::Timeout(raw)),
            },
        };

        let log_file = lookup("TODO_LOG_FILE").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self { api_url, request_timeout, log_file })
    }
}
