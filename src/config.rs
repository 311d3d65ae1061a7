//! Startup configuration for the Todoist connection.
//!
//! Everything here is resolved once, before the registry is built. A missing
//! credential is a fatal startup error, never a per-call failure.

use std::{fmt, time::Duration};
use url::Url;

/// Environment variable holding the Todoist bearer token.
pub const API_TOKEN_ENV: &str = "TODOIST_API_TOKEN";

/// Environment variable overriding the REST base URL.
pub const BASE_URL_ENV: &str = "TODOIST_API_URL";

/// Environment variable holding the upstream request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "TODOIST_TIMEOUT_SECS";

/// Base URL of the Todoist REST API v1.
pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";

/// Errors raised while assembling [`TodoistConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No token was supplied, or it was blank.
    MissingApiToken,
    /// The base URL could not be parsed or cannot carry path segments.
    InvalidBaseUrl(String),
    /// The timeout was not a positive whole number of seconds.
    InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiToken => write!(
                f,
                "Todoist API token is required (set {} or pass --api-token)",
                API_TOKEN_ENV
            ),
            Self::InvalidBaseUrl(msg) => write!(f, "Invalid Todoist base URL: {}", msg),
            Self::InvalidTimeout(raw) => write!(
                f,
                "Invalid request timeout `{}`: expected a positive number of seconds",
                raw
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection settings for the upstream Todoist API.
#[derive(Clone)]
pub struct TodoistConfig {
    api_token: String,
    base_url: Url,
    request_timeout: Option<Duration>,
}

impl fmt::Debug for TodoistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoistConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl TodoistConfig {
    /// Create a config for the default API endpoint.
    pub fn new(api_token: impl Into<String>) -> Result<Self, ConfigError> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(ConfigError::MissingApiToken);
        }

        Ok(Self {
            api_token,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            request_timeout: None,
        })
    }

    /// Override the REST base URL (useful for proxies and tests).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Set a timeout applied to every upstream request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration through a lookup keyed by environment variable name.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(API_TOKEN_ENV).ok_or(ConfigError::MissingApiToken)?;
        let mut config = Self::new(token)?;

        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(&url)?;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|t| !t.trim().is_empty()) {
            config = config.with_request_timeout(parse_timeout_secs(&raw)?);
        }

        Ok(config)
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

/// Parse a timeout given in whole seconds.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "`{}` cannot be used as a base URL",
            raw
        )));
    }
    Ok(url)
}
