//! Client-side authentication state.
//!
//! [`SessionStore`] tracks who is signed in. It is created once per
//! application, shared by `Arc`, and handed to the
//! [`ApiClient`](crate::clients::ApiClient), which clears it when the login is
//! irrecoverably lost.
//!
//! Only the [`Session`] subset (`user`, `isAuthenticated`) is persisted. The
//! transient fields (`loading`, `error`, `has_checked_auth`) start at their
//! defaults on every construction.
//!
//! # Example
//!
//! ```rust
//! use banthing_client::auth::{MemoryStorage, SessionStore};
//! use std::sync::Arc;
//!
//! let store = SessionStore::with_storage(Arc::new(MemoryStorage::new()), "auth");
//! assert!(!store.is_authenticated());
//!
//! store.clear();
//! assert!(store.state().has_checked_auth);
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::auth::storage::{MemoryStorage, SessionStorage, StorageError};
use crate::auth::user::UserProfile;
use crate::clients::ApiClient;
use crate::config::{BanthingConfig, DEFAULT_STORAGE_KEY};

/// Error recorded by [`SessionStore::fetch_me`] when the profile call fails.
pub const UNAUTHENTICATED: &str = "unauthenticated";

/// The persisted part of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in user.
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Whether a user is signed in.
    #[serde(default)]
    pub is_authenticated: bool,
}

/// A snapshot of the whole session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The signed-in user.
    pub user: Option<UserProfile>,
    /// Whether a user is signed in.
    pub is_authenticated: bool,
    /// A profile fetch is in progress.
    pub loading: bool,
    /// The last fetch error.
    pub error: Option<String>,
    /// At least one profile fetch, logout or clear has completed.
    pub has_checked_auth: bool,
}

impl SessionState {
    fn restored(session: Session) -> Self {
        Self {
            user: session.user,
            is_authenticated: session.is_authenticated,
            ..Self::default()
        }
    }

    fn signed_out() -> Self {
        Self {
            has_checked_auth: true,
            ..Self::default()
        }
    }

    fn persisted(&self) -> Session {
        Session {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}

/// Shared authentication state.
///
/// All methods take `&self`; the state is guarded by an `RwLock` that is
/// never held across an `.await`. Concurrent writers are last-writer-wins.
#[derive(Debug)]
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
    key: String,
}

// Verify SessionStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SessionStore>();
};

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates an in-memory store under the default key.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY)
    }

    /// Creates a store backed by `storage` under the key from `config`.
    #[must_use]
    pub fn from_config(config: &BanthingConfig, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_storage(storage, config.storage_key())
    }

    /// Creates a store backed by `storage`, restoring any snapshot under `key`.
    ///
    /// An unreadable snapshot is logged and ignored.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let session = match Self::restore(storage.as_ref(), &key) {
            Ok(session) => session.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "could not restore session, starting signed out");
                Session::default()
            }
        };
        tracing::debug!(key = %key, authenticated = session.is_authenticated, "session restored");

        Self {
            state: RwLock::new(SessionState::restored(session)),
            storage,
            key,
        }
    }

    fn restore(storage: &dyn SessionStorage, key: &str) -> Result<Option<Session>, StorageError> {
        match storage.load(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the persisted part of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .persisted()
    }

    /// Returns the signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    /// Returns `true` if a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated
    }

    /// Returns the storage key the snapshot is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Sets the signed-in user, or signs out with `None`.
    ///
    /// Clears any recorded error.
    pub fn set_user(&self, user: Option<UserProfile>) {
        let mut state = self.write();
        state.is_authenticated = user.is_some();
        state.user = user;
        state.error = None;
        self.persist(&state);
    }

    /// Signs out locally and marks the auth check as done.
    pub fn clear(&self) {
        let mut state = self.write();
        *state = SessionState::signed_out();
        self.persist(&state);
    }

    /// Loads the signed-in user from `GET /users/me`.
    ///
    /// Any accepted envelope counts as signed in, even one without a profile.
    /// A rejected envelope signs out. A failed call signs out and records
    /// [`UNAUTHENTICATED`]. Either way `has_checked_auth` ends up `true`.
    pub async fn fetch_me(&self, client: &ApiClient) {
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }

        let outcome = client.auth().current_user().await;

        let mut state = self.write();
        match outcome {
            Ok(envelope) if envelope.success => {
                state.is_authenticated = true;
                state.user = envelope.data;
            }
            Ok(_) => {
                state.user = None;
                state.is_authenticated = false;
            }
            Err(error) => {
                tracing::debug!(error = %error, "profile fetch failed");
                state.user = None;
                state.is_authenticated = false;
                state.error = Some(UNAUTHENTICATED.to_string());
            }
        }
        state.loading = false;
        state.has_checked_auth = true;
        self.persist(&state);
    }

    /// Reloads the signed-in user without touching `loading`, `error` or
    /// `has_checked_auth`. A failed call leaves the state unchanged.
    pub async fn refresh_me_silent(&self, client: &ApiClient) {
        let outcome = client.auth().current_user().await;

        let mut state = self.write();
        match outcome {
            Ok(envelope) if envelope.success => {
                state.is_authenticated = true;
                state.user = envelope.data;
            }
            Ok(_) => {
                state.user = None;
                state.is_authenticated = false;
            }
            Err(error) => {
                tracing::debug!(error = %error, "silent profile refresh failed");
                return;
            }
        }
        self.persist(&state);
    }

    /// Calls `POST /auth/logout` and signs out locally, whatever the server says.
    pub async fn logout(&self, client: &ApiClient) {
        let result = client.auth().logout().await;
        if !result.success {
            tracing::debug!(message = ?result.message, "server logout failed, signing out locally");
        }
        self.clear();
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &SessionState) {
        let result = serde_json::to_string(&state.persisted())
            .map_err(StorageError::from)
            .and_then(|json| self.storage.save(&self.key, &json));
        if let Err(error) = result {
            tracing::warn!(key = %self.key, error = %error, "could not persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::FileStorage;

    fn user(id: i64) -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "userId": id,
            "nickname": "kim",
            "trustScore": 300,
            "trustGrade": "BASIC"
        }))
        .unwrap()
    }

    #[test]
    fn test_new_store_is_signed_out_and_unchecked() {
        let store = SessionStore::new();
        assert_eq!(store.state(), SessionState::default());
        assert_eq!(store.storage_key(), "auth");
    }

    #[test]
    fn test_set_user_authenticates_and_clears_error() {
        let store = SessionStore::new();
        store.write().error = Some("old".to_string());

        store.set_user(Some(user(1)));

        let state = store.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user.map(|u| u.user_id), Some(1));
        assert!(state.error.is_none());

        store.set_user(None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clear_marks_auth_checked() {
        let store = SessionStore::new();
        store.set_user(Some(user(1)));

        store.clear();

        let state = store.state();
        assert!(state.user.is_none());
        assert!(!state.is_authenticated);
        assert!(state.has_checked_auth);
    }

    #[test]
    fn test_snapshot_serializes_only_persisted_fields() {
        let store = SessionStore::new();
        store.set_user(Some(user(2)));

        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["userId"], 2);
        assert!(json.get("loading").is_none());
        assert!(json.get("hasCheckedAuth").is_none());
    }

    #[test]
    fn test_restore_resets_transient_fields() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::new(dir.path()));

        let first = SessionStore::with_storage(Arc::clone(&storage), "auth");
        first.set_user(Some(user(3)));
        first.write().loading = true;

        let second = SessionStore::with_storage(storage, "auth");
        let state = second.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user.map(|u| u.user_id), Some(3));
        assert!(!state.loading);
        assert!(!state.has_checked_auth);
    }

    #[test]
    fn test_corrupt_snapshot_starts_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save("auth", "{not json").unwrap();

        let store = SessionStore::with_storage(storage, "auth");
        assert!(!store.is_authenticated());
    }
}
