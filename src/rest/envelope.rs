//! Response envelopes and the uniform result returned by resource calls.
//!
//! The backend answers in more than one shape:
//!
//! - [`Envelope<T>`]: `{ "success": true, "message": ..., "data": ... }` or the
//!   older `{ "status": "success", "message": ..., "data": ... }`
//! - bare DTOs (comment create/update) and typed lists (comment list)
//! - no content at all (`204`)
//!
//! Each resource operation decodes the shape its endpoint uses and folds the
//! outcome into an [`ApiResult<T>`]. Failures become a message chosen from the
//! operation's [`ErrorMessages`] table.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::rest::ResourceError;

/// The uniform outcome of a resource call.
///
/// Resource calls never return `Err`; a failed call yields `success: false`
/// and a human-readable `message`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResult<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// The decoded payload, if any.
    pub data: Option<T>,
    /// Server-provided or fallback message.
    pub message: Option<String>,
}

impl<T> ApiResult<T> {
    /// A successful result.
    #[must_use]
    pub const fn ok(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
        }
    }

    /// A failed result with no payload.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Fills in `data` on a failed result that carries none.
    #[must_use]
    pub fn or_data(mut self, data: T) -> Self {
        if !self.success && self.data.is_none() {
            self.data = Some(data);
        }
        self
    }

    /// Returns `true` if the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Consumes the result, returning the payload.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// The common `{success | status, message, data}` wrapper.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope<T> {
    /// `true` when the body had `success: true` or `status: "success"`.
    pub success: bool,
    /// The server message.
    pub message: Option<String>,
    /// The payload.
    pub data: Option<T>,
}

#[derive(Deserialize)]
struct RawEnvelope<T> {
    success: Option<bool>,
    status: Option<String>,
    message: Option<String>,
    data: Option<T>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decodes an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if the body is not an object or `data`
    /// does not match `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use banthing_client::rest::Envelope;
    /// use serde_json::json;
    ///
    /// let envelope: Envelope<u32> =
    ///     Envelope::decode(json!({"status": "success", "message": "ok", "data": 3})).unwrap();
    /// assert!(envelope.success);
    /// assert_eq!(envelope.data, Some(3));
    /// ```
    pub fn decode(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: RawEnvelope<T> = serde_json::from_value(body)?;
        let success =
            raw.success.unwrap_or(false) || raw.status.as_deref() == Some("success");
        Ok(Self {
            success,
            message: raw.message,
            data: raw.data,
        })
    }
}

/// How to phrase a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// Always this text.
    Fixed(&'static str),
    /// The server's `message` when present, else this text.
    ServerOr(&'static str),
}

impl Message {
    /// Renders the message given the server's message, if any.
    #[must_use]
    pub fn render(self, server: Option<&str>) -> String {
        match self {
            Self::Fixed(text) => text.to_string(),
            Self::ServerOr(fallback) => server.unwrap_or(fallback).to_string(),
        }
    }
}

/// Per-operation table mapping failures to messages.
///
/// # Example
///
/// ```rust
/// use banthing_client::rest::{ErrorMessages, Message};
///
/// const JOIN: ErrorMessages = ErrorMessages::new(Message::Fixed("Could not apply."))
///     .on(&[(409, Message::Fixed("Already applied."))]);
///
/// assert_eq!(JOIN.for_status(409, Some("dup")), "Already applied.");
/// assert_eq!(JOIN.for_status(500, None), "Could not apply.");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ErrorMessages {
    statuses: &'static [(u16, Message)],
    network: Option<&'static str>,
    fallback: Message,
    rejected: Message,
    accepted: Option<&'static str>,
}

impl ErrorMessages {
    /// Creates a table where every failure renders `fallback`.
    #[must_use]
    pub const fn new(fallback: Message) -> Self {
        Self {
            statuses: &[],
            network: None,
            fallback,
            rejected: fallback,
            accepted: None,
        }
    }

    /// Sets the messages for specific HTTP statuses.
    #[must_use]
    pub const fn on(mut self, statuses: &'static [(u16, Message)]) -> Self {
        self.statuses = statuses;
        self
    }

    /// Sets the message used when no response was received.
    #[must_use]
    pub const fn network(mut self, message: &'static str) -> Self {
        self.network = Some(message);
        self
    }

    /// Sets the message used for a 2xx envelope with `success: false`.
    #[must_use]
    pub const fn rejected(mut self, message: Message) -> Self {
        self.rejected = message;
        self
    }

    /// Sets the message used for a successful envelope without one.
    #[must_use]
    pub const fn accepted(mut self, message: &'static str) -> Self {
        self.accepted = Some(message);
        self
    }

    /// Renders the message for an error response with `status`.
    #[must_use]
    pub fn for_status(&self, status: u16, server: Option<&str>) -> String {
        self.statuses
            .iter()
            .find(|(code, _)| *code == status)
            .map_or(self.fallback, |(_, message)| *message)
            .render(server)
    }

    /// Renders the message for a failed call.
    #[must_use]
    pub fn for_error(&self, error: &ResourceError) -> String {
        match (error.status(), self.network) {
            (Some(status), _) => self.for_status(status, error.server_message()),
            (None, Some(network)) if error.is_network() => network.to_string(),
            (None, _) => self.fallback.render(None),
        }
    }

    /// Folds a decoded envelope into an [`ApiResult`].
    #[must_use]
    pub fn accept<T>(&self, envelope: Envelope<T>) -> ApiResult<T> {
        if envelope.success {
            let message = envelope
                .message
                .or_else(|| self.accepted.map(str::to_string));
            ApiResult::ok(envelope.data, message)
        } else {
            ApiResult::failure(self.rejected.render(envelope.message.as_deref()))
        }
    }

    /// Turns the outcome of a call into an [`ApiResult`], logging failures.
    pub(crate) fn settle<T>(
        &self,
        operation: &'static str,
        outcome: Result<ApiResult<T>, ResourceError>,
    ) -> ApiResult<T> {
        match outcome {
            Ok(result) => {
                if !result.success {
                    tracing::debug!(operation, message = ?result.message, "request rejected by server");
                }
                result
            }
            Err(error) => {
                tracing::warn!(operation, status = ?error.status(), error = %error, "request failed");
                ApiResult::failure(self.for_error(&error))
            }
        }
    }
}
