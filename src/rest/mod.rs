//! Typed resource APIs for the BanThing backend.
//!
//! Every resource is reached through an [`ApiClient`] accessor and returns an
//! [`ApiResult<T>`]. Resource calls never return `Err`: transport and status
//! failures are turned into a failure result with a message from the
//! operation's [`ErrorMessages`] table, and logged with `tracing`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use banthing_client::{ApiClient, BanthingConfig, SessionStore};
//!
//! let client = ApiClient::new(&BanthingConfig::from_env()?, Arc::new(SessionStore::new()))?;
//!
//! let result = client.meetings().join(12).await;
//! if result.success {
//!     println!("{}", result.message.unwrap_or_default());
//! } else {
//!     eprintln!("join failed: {:?}", result.message);
//! }
//! ```

mod envelope;
mod errors;
pub mod resources;

pub use envelope::{ApiResult, Envelope, ErrorMessages, Message};
pub use errors::ResourceError;

use serde::de::DeserializeOwned;

use crate::clients::{ApiClient, HttpRequestBuilder};

/// Message shared by every operation that requires a signed-in user.
pub(crate) const LOGIN_REQUIRED: Message = Message::Fixed("Login required.");

impl ApiClient {
    /// Builds and sends a request, returning the response body.
    pub(crate) async fn fetch(
        &self,
        request: HttpRequestBuilder,
    ) -> Result<serde_json::Value, ResourceError> {
        let response = self.send(request.build()?).await?;
        Ok(response.body)
    }

    /// Sends a request and decodes the common envelope.
    pub(crate) async fn fetch_envelope<T: DeserializeOwned>(
        &self,
        request: HttpRequestBuilder,
    ) -> Result<Envelope<T>, ResourceError> {
        let body = self.fetch(request).await?;
        Ok(Envelope::decode(body)?)
    }

    /// Sends a request whose body is a bare DTO.
    pub(crate) async fn fetch_bare<T: DeserializeOwned>(
        &self,
        request: HttpRequestBuilder,
    ) -> Result<T, ResourceError> {
        let body = self.fetch(request).await?;
        Ok(serde_json::from_value(body)?)
    }
}
