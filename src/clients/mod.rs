//! HTTP client types for BanThing API communication.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiClient`]: The authenticated gateway; every resource call goes through it
//! - [`HttpClient`]: The cookie-carrying transport that sends a request once
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`RefreshCoordinator`]: Single-flight coordination of session refreshes
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use banthing_client::{ApiClient, BanthingConfig, SessionStore};
//! use banthing_client::clients::{HttpMethod, HttpRequest};
//!
//! let config = BanthingConfig::from_env()?;
//! let client = ApiClient::new(&config, Arc::new(SessionStore::new()))?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/marts").build()?;
//! let response = client.send(request).await?;
//! ```
//!
//! # Session refresh
//!
//! A 401 on an ordinary request starts (or joins) one `POST /auth/refresh`
//! call. Once it settles, every waiting request is replayed exactly once.
//! Nothing else is retried.

mod errors;
mod gateway;
mod http_client;
mod http_request;
mod http_response;
mod refresh;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use gateway::{ApiClient, Recovery};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    HttpMethod, HttpRequest, HttpRequestBuilder, MultipartBody, MultipartPart, PartContent,
    RequestBody,
};
pub use http_response::HttpResponse;
pub use refresh::{RefreshCoordinator, RefreshOutcome, RefreshRole};
