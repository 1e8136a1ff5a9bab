//! Error type for resource calls.
//!
//! Resource methods never return these errors to their callers. They are
//! produced internally and rendered into the failure message of an
//! [`ApiResult`](crate::rest::ApiResult) through the operation's
//! [`ErrorMessages`](crate::rest::ErrorMessages) table.
//!
//! They are public so callers that need the raw outcome (the session store,
//! or code reusing [`AuthApi::current_user`](crate::rest::resources::AuthApi::current_user))
//! can inspect them.

use thiserror::Error;

use crate::clients::{HttpError, InvalidHttpRequestError};

/// Error raised while calling a resource endpoint.
///
/// # Example
///
/// ```rust
/// use banthing_client::rest::ResourceError;
///
/// let error = ResourceError::InvalidArgument {
///     name: "condition",
///     reason: "expected APPROVED or PENDING".to_string(),
/// };
/// assert!(error.to_string().contains("condition"));
/// assert_eq!(error.status(), None);
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The gateway call failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An argument was rejected before any request was sent.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The argument name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<InvalidHttpRequestError> for ResourceError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

impl ResourceError {
    /// Returns the HTTP status behind this error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            Self::Decode(_) | Self::InvalidArgument { .. } => None,
        }
    }

    /// Returns the server's `message` field, if the error response carried one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http(e) => e.response().and_then(|r| r.server_message()),
            Self::Decode(_) | Self::InvalidArgument { .. } => None,
        }
    }

    /// Returns `true` if no response was received at all.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(HttpError::Network(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;
    use serde_json::json;

    fn forbidden() -> ResourceError {
        ResourceError::Http(HttpError::Response(HttpResponseError {
            code: 403,
            message: "forbidden".to_string(),
            error_reference: None,
            body: json!({"message": "forbidden"}),
        }))
    }

    #[test]
    fn test_status_and_server_message_from_response() {
        let error = forbidden();
        assert_eq!(error.status(), Some(403));
        assert_eq!(error.server_message(), Some("forbidden"));
        assert!(!error.is_network());
    }

    #[test]
    fn test_invalid_request_converts_to_http_error() {
        let error: ResourceError = InvalidHttpRequestError::EmptyPath.into();
        assert!(matches!(
            error,
            ResourceError::Http(HttpError::InvalidRequest(_))
        ));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let decode = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let error = ResourceError::from(decode);
        assert_eq!(error.status(), None);
        assert!(error.server_message().is_none());
        assert!(error.to_string().starts_with("Unexpected response body"));
    }
}
