//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `SWIPEY_API_URL` - Backend REST base URL (default: `http://localhost:5000/api`)
//! - `SWIPEY_DATA_DIR` - Directory for persisted stores (default: platform data dir + `swipey`)
//! - `SWIPEY_PAGE_SIZE` - Feed page size (default: 20)
//! - `SWIPEY_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend base URL used during local development.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DATA_DIR_NAME: &str = "swipey";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend REST base URL, always ending in `/`
    pub api_base_url: Url,
    /// Directory holding the persisted store documents
    pub data_dir: PathBuf,
    /// Number of products requested per feed page
    pub page_size: usize,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the endpoints.
    #[must_use]
    pub fn new(api_base_url: Url, data_dir: PathBuf) -> Self {
        Self {
            api_base_url: with_trailing_slash(api_base_url),
            data_dir,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_api_url(&get_env_or_default("SWIPEY_API_URL", DEFAULT_API_URL))?;
        let data_dir = match get_optional_env("SWIPEY_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let page_size = parse_page_size(&get_env_or_default(
            "SWIPEY_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        ))?;
        let timeout_secs = get_env_or_default(
            "SWIPEY_REQUEST_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SWIPEY_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            data_dir,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Default directory for persisted stores.
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or_else(|| ConfigError::MissingEnvVar("SWIPEY_DATA_DIR".to_string()))
}

/// Parse and normalize the API base URL.
fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("SWIPEY_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "SWIPEY_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(with_trailing_slash(url))
}

/// Parse the feed page size, which must be at least 1.
fn parse_page_size(value: &str) -> Result<usize, ConfigError> {
    let size = value
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar("SWIPEY_PAGE_SIZE".to_string(), e.to_string()))?;
    if size == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "SWIPEY_PAGE_SIZE".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(size)
}

/// Ensure the URL path ends in `/` so relative joins append instead of replace.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_adds_trailing_slash() {
        let url = parse_api_url("http://localhost:5000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/");
        assert_eq!(url.join("feed").unwrap().as_str(), "http://localhost:5000/api/feed");
    }

    #[test]
    fn test_parse_api_url_keeps_existing_slash() {
        let url = parse_api_url("https://shop.example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/");
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(matches!(
            parse_api_url("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        assert!(parse_api_url("ftp://example.com/api").is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("25").unwrap(), 25);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("-1").is_err());
        assert!(parse_page_size("many").is_err());
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new(
            Url::parse("http://127.0.0.1:9999/api").unwrap(),
            PathBuf::from("/tmp/swipey"),
        );
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:9999/api/");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.sentry_dsn.is_none());
    }
}
