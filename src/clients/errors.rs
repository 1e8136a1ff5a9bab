//! HTTP-specific error types for the BanThing client.
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the API
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use banthing_client::clients::{HttpError, HttpMethod, HttpRequest};
//!
//! match client.send(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::RefreshFailed(e)) => println!("Session expired: {e}"),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(HttpError::RefreshAbandoned) => println!("Refresh abandoned"),
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// `message` holds the server's `message` field when the body carries one,
/// otherwise the raw response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Error message extracted from the response.
    pub message: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub error_reference: Option<String>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponseError {
    /// Returns the server-provided `message` field, if the body carried one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
    }
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path is empty.
    #[error("Cannot send a request without a path.")]
    EmptyPath,

    /// The request path is an absolute URL instead of an API path.
    #[error("Request path '{path}' must be relative to the configured base URL.")]
    AbsolutePath {
        /// The offending path.
        path: String,
    },

    /// A GET request was given a body.
    #[error("Cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The HTTP method that does not accept a body.
        method: String,
    },

    /// A multipart part could not be encoded.
    #[error("Invalid multipart part '{name}': {reason}")]
    InvalidPart {
        /// The part name.
        name: String,
        /// Why the part was rejected.
        reason: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error; no response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The session refresh triggered by a 401 failed.
    ///
    /// Every request that waited on the same refresh receives the same
    /// underlying error.
    #[error("Session refresh failed: {0}")]
    RefreshFailed(#[source] Arc<HttpError>),

    /// The refresh this request was waiting on was dropped before it settled.
    #[error("The session refresh was abandoned before it settled.")]
    RefreshAbandoned,
}

impl HttpError {
    /// Returns the HTTP status code behind this error, if a response was received.
    ///
    /// For [`HttpError::RefreshFailed`] this is the status of the refresh call.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::RefreshFailed(inner) => inner.status(),
            Self::InvalidRequest(_) | Self::Network(_) | Self::RefreshAbandoned => None,
        }
    }

    /// Returns the response error behind this error, if any.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponseError> {
        match self {
            Self::Response(e) => Some(e),
            Self::RefreshFailed(inner) => inner.response(),
            Self::InvalidRequest(_) | Self::Network(_) | Self::RefreshAbandoned => None,
        }
    }

    /// Returns `true` if the response was 401 Unauthorized.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Response(e) if e.code == 401)
    }
}
