// Configuration module: everything the run needs that is not typed in by
// the operator. Values are read once at startup and never change.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.groupme.com/v3";
pub const DEFAULT_OUTPUT_FILE: &str = "linkedin_urls.txt";
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;

/// Groups requested by the single listing call. Groups beyond this are not shown.
pub const GROUPS_PER_PAGE: u32 = 50;
/// Messages requested per page of history.
pub const MESSAGES_PER_PAGE: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub output_path: PathBuf,
    /// Pause between successive message-page requests.
    pub page_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// `GROUPME_API_URL`, `LINKEDIN_OUTPUT_FILE` and `GROUPME_PAGE_DELAY_MS`
    /// override the defaults; unset or blank variables keep them.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = get("GROUPME_API_URL") {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    name: "GROUPME_API_URL".into(),
                    message: format!("expected an http(s) URL, got {url:?}"),
                });
            }
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(path) = get("LINKEDIN_OUTPUT_FILE") {
            config.output_path = PathBuf::from(path);
        }

        if let Some(ms) = get("GROUPME_PAGE_DELAY_MS") {
            let ms: u64 = ms.parse().map_err(|source| ConfigError::ParseInt {
                name: "GROUPME_PAGE_DELAY_MS".into(),
                source,
            })?;
            config.page_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}
