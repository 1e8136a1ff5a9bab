//! Authentication state for the BanThing client.
//!
//! Credentials are HTTP-only cookies held by the transport; this module never
//! sees a token. It tracks who is signed in and persists that across restarts.
//!
//! # Overview
//!
//! - [`SessionStore`]: shared session state, cleared by the gateway when the
//!   login is lost
//! - [`Session`]: the persisted `{user, isAuthenticated}` snapshot
//! - [`SessionStorage`]: key-value persistence backend, with
//!   [`MemoryStorage`] and [`FileStorage`] implementations
//! - [`UserProfile`]: the signed-in user's profile
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use banthing_client::{ApiClient, BanthingConfig};
//! use banthing_client::auth::{FileStorage, SessionStore};
//!
//! let config = BanthingConfig::from_env()?;
//! let storage = Arc::new(FileStorage::new("/var/lib/banthing"));
//! let session = Arc::new(SessionStore::from_config(&config, storage));
//! let client = ApiClient::new(&config, Arc::clone(&session))?;
//!
//! session.fetch_me(&client).await;
//! if let Some(user) = session.user() {
//!     println!("signed in as {}", user.nickname);
//! }
//! ```

mod session;
mod storage;
mod user;

pub use session::{Session, SessionState, SessionStore, UNAUTHENTICATED};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use user::{TrustGrade, UserProfile};
