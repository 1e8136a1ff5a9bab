//! Configuration types for the BanThing client.
//!
//! # Overview
//!
//! - [`BanthingConfig`]: The configuration struct holding all client settings
//! - [`BanthingConfigBuilder`]: A builder for constructing [`BanthingConfig`] instances
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use banthing_client::{BanthingConfig, BaseUrl};
//! use std::time::Duration;
//!
//! let config = BanthingConfig::builder()
//!     .base_url(BaseUrl::new("https://api.banthing.com/api").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.refresh_path(), "/auth/refresh");
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "BANTHING_API_URL";

/// Environment variable holding an optional user agent prefix.
pub const USER_AGENT_PREFIX_ENV: &str = "BANTHING_USER_AGENT_PREFIX";

/// Base URL used when [`API_URL_ENV`] is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:9000/api";

/// Path of the endpoint that exchanges the refresh cookie for a new access cookie.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Storage key the session snapshot is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "auth";

/// Configuration for the BanThing client.
///
/// `BanthingConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct BanthingConfig {
    base_url: BaseUrl,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    refresh_path: String,
    storage_key: String,
}

impl BanthingConfig {
    /// Creates a new builder for constructing a `BanthingConfig`.
    #[must_use]
    pub fn builder() -> BanthingConfigBuilder {
        BanthingConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads [`API_URL_ENV`] (falling back to [`DEFAULT_API_URL`]) and
    /// [`USER_AGENT_PREFIX_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the environment holds an
    /// invalid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut builder = Self::builder().base_url(BaseUrl::new(url)?);
        if let Ok(prefix) = std::env::var(USER_AGENT_PREFIX_ENV) {
            builder = builder.user_agent_prefix(prefix);
        }
        builder.build()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request transport timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the refresh endpoint path.
    #[must_use]
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    /// Returns the key the session snapshot is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

// Verify BanthingConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BanthingConfig>();
};

/// Builder for constructing [`BanthingConfig`] instances.
///
/// `base_url` is required. Defaults:
///
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None` (transport default)
/// - `refresh_path`: [`DEFAULT_REFRESH_PATH`]
/// - `storage_key`: [`DEFAULT_STORAGE_KEY`]
#[derive(Debug, Default)]
pub struct BanthingConfigBuilder {
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    refresh_path: Option<String>,
    storage_key: Option<String>,
}

impl BanthingConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the per-request transport timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the refresh endpoint path.
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Overrides the session storage key.
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Builds the [`BanthingConfig`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `base_url` is not set
    /// - [`ConfigError::EmptyUserAgentPrefix`] if the prefix is blank
    /// - [`ConfigError::InvalidRefreshPath`] if the refresh path does not start with `/`
    pub fn build(self) -> Result<BanthingConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        if self
            .user_agent_prefix
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigError::EmptyUserAgentPrefix);
        }

        let refresh_path = self
            .refresh_path
            .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string());
        if !refresh_path.starts_with('/') {
            return Err(ConfigError::InvalidRefreshPath { path: refresh_path });
        }

        Ok(BanthingConfig {
            base_url,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            refresh_path,
            storage_key: self
                .storage_key
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
        })
    }
}
