//! # BanThing API Client
//!
//! An async Rust client for the BanThing group-buying API: find people to
//! split a warehouse-store purchase with, organize the meeting, and rate each
//! other afterwards.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`BanthingConfig`] and [`BanthingConfigBuilder`]
//! - An authenticated gateway ([`ApiClient`]) that recovers from an expired
//!   session with a single shared refresh call and one replay per request
//! - A session store ([`SessionStore`]) persisted through a pluggable
//!   [`SessionStorage`](auth::SessionStorage) backend
//! - Typed resource APIs ([`rest::resources`]) that never return `Err`; every
//!   call yields an [`ApiResult`]
//!
//! ## Quick Start
//!
//! ```rust
//! use banthing_client::{BanthingConfig, BaseUrl};
//!
//! let config = BanthingConfig::builder()
//!     .base_url(BaseUrl::new("https://api.banthing.com/api").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().host_name(), "api.banthing.com");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use banthing_client::{ApiClient, BanthingConfig, SessionStore};
//!
//! let config = BanthingConfig::from_env()?;
//! let session = Arc::new(SessionStore::new());
//! let client = ApiClient::new(&config, Arc::clone(&session))?;
//!
//! session.fetch_me(&client).await;
//!
//! let result = client.meetings().search(Some("costco")).await;
//! for meeting in result.data.unwrap_or_default() {
//!     println!("{} ({}/{})", meeting.title, meeting.current_participants, meeting.max_participants);
//! }
//! ```
//!
//! ## Session Refresh
//!
//! Credentials are HTTP-only cookies kept in the transport's cookie jar. When
//! a request fails with 401, [`ApiClient`] calls the refresh endpoint once,
//! shared by every request that failed meanwhile, and replays each of them
//! once. If the refresh or a replay fails with 401 the session store is
//! cleared.
//!
//! ## Design Principles
//!
//! - **No global state**: the client and the session store are instances
//!   passed explicitly
//! - **Fail-fast validation**: configuration newtypes validate on construction
//! - **Thread-safe**: all shared types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{Session, SessionState, SessionStore, UserProfile};
pub use config::{BanthingConfig, BanthingConfigBuilder, BaseUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiClient, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export resource result types
pub use rest::{ApiResult, ResourceError};
