//! Error types for the BanThing client.
//!
//! This module contains the configuration and validation errors raised while
//! building a [`BanthingConfig`](crate::BanthingConfig).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use banthing_client::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme and host (e.g., 'https://api.banthing.com/api').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The user agent prefix was set but is blank.
    #[error("User agent prefix cannot be blank.")]
    EmptyUserAgentPrefix,

    /// The refresh path is not an absolute API path.
    #[error("Invalid refresh path '{path}'. Expected a path starting with '/'.")]
    InvalidRefreshPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
