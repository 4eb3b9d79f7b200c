//! Connection settings for the hosted backend and the geocoding service.

use std::time::Duration;

use thiserror::Error;

pub const ENV_BACKEND_URL: &str = "CIVIC_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "CIVIC_BACKEND_KEY";
pub const ENV_ACCESS_TOKEN: &str = "CIVIC_ACCESS_TOKEN";
pub const ENV_MAPBOX_TOKEN: &str = "CIVIC_MAPBOX_TOKEN";

pub const DEFAULT_GEOCODING_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Storage and complaints-table backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,

    /// Public API key sent as `apikey` on every request.
    pub api_key: String,

    /// Signed-in user's token. Falls back to `api_key` when absent.
    pub access_token: Option<String>,

    pub request_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BACKEND_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BACKEND_URL))?;
        let api_key = lookup(ENV_BACKEND_KEY)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BACKEND_KEY))?;

        let mut config = Self::new(base_url, api_key);
        config.access_token = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                name: ENV_BACKEND_URL,
                reason: format!("expected an http(s) URL, got {:?}", self.base_url),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "request_timeout",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// `base_url` joined with `path`, tolerating a trailing slash on the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, ConfigError> {
        self.validate()?;
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))
    }
}

/// Reverse geocoding service.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub access_token: String,
    pub endpoint: String,
    pub request_timeout: Duration,
}

impl GeocoderConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            endpoint: DEFAULT_GEOCODING_ENDPOINT.into(),
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        lookup(ENV_MAPBOX_TOKEN)
            .filter(|v| !v.trim().is_empty())
            .map(Self::new)
            .ok_or(ConfigError::Missing(ENV_MAPBOX_TOKEN))
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))
    }
}
