//! Configuration management for the catalog client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary loads a `.env` file first, so either works.

use crate::i18n::{Locale, UnknownLocale};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// API root used when `CATALOG_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:5129/CollectionsApi";

/// Interval between comment refreshes on an item page
pub const DEFAULT_COMMENT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long shutdown waits for running effects
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `CATALOG_API_URL` is not a valid absolute URL
    #[error("Invalid API URL {value:?}: {source}")]
    InvalidApiUrl {
        /// The rejected value
        value: String,
        /// Parse failure
        source: url::ParseError,
    },

    /// `CATALOG_DEFAULT_LOCALE` is not a supported locale
    #[error(transparent)]
    InvalidLocale(#[from] UnknownLocale),

    /// `CATALOG_STORAGE_PATH` is unset and no home directory is known
    #[error("No home directory; set CATALOG_STORAGE_PATH")]
    NoHomeDirectory,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the catalog API
    pub api_url: Url,
    /// JSON file holding the session and preferences
    pub storage_path: PathBuf,
    /// Interval between comment refreshes on an item page
    pub comment_poll_interval: Duration,
    /// Locale used until the user picks one
    pub default_locale: Locale,
    /// How long shutdown waits for running effects
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Configuration for `api_url` and `storage_path` with every other
    /// setting at its default
    #[must_use]
    pub fn new(api_url: Url, storage_path: PathBuf) -> Self {
        Self {
            api_url,
            storage_path,
            comment_poll_interval: DEFAULT_COMMENT_POLL_INTERVAL,
            default_locale: Locale::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Load configuration from environment variables
    ///
    /// | variable | default |
    /// |----------|---------|
    /// | `CATALOG_API_URL` | [`DEFAULT_API_URL`] |
    /// | `CATALOG_STORAGE_PATH` | `~/.catalog/storage.json` |
    /// | `CATALOG_COMMENT_POLL_SECS` | 5 |
    /// | `CATALOG_DEFAULT_LOCALE` | `en` |
    /// | `CATALOG_SHUTDOWN_TIMEOUT_SECS` | 10 |
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API URL or the locale is invalid, or
    /// if no storage path is set and the home directory is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url =
            env::var("CATALOG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url).map_err(|source| ConfigError::InvalidApiUrl {
            value: api_url.clone(),
            source,
        })?;

        let default_locale = match env::var("CATALOG_DEFAULT_LOCALE") {
            Ok(code) => code.parse()?,
            Err(_) => Locale::default(),
        };

        Ok(Self {
            api_url,
            storage_path: match env::var_os("CATALOG_STORAGE_PATH") {
                Some(path) => PathBuf::from(path),
                None => default_storage_path()?,
            },
            comment_poll_interval: env::var("CATALOG_COMMENT_POLL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_COMMENT_POLL_INTERVAL, Duration::from_secs),
            default_locale,
            shutdown_timeout: env::var("CATALOG_SHUTDOWN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_SHUTDOWN_TIMEOUT, Duration::from_secs),
        })
    }
}

/// `~/.catalog/storage.json`
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] when the platform reports no
/// home directory.
pub fn default_storage_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".catalog").join("storage.json"))
        .ok_or(ConfigError::NoHomeDirectory)
}
