//! Session and account endpoints.
//!
//! Credentials are HTTP-only cookies; these calls only ever observe or rotate
//! them through the transport's cookie jar.

use serde::{Deserialize, Serialize};

use crate::auth::UserProfile;
use crate::clients::{ApiClient, HttpMethod, HttpRequest};
use crate::rest::{ApiResult, Envelope, ErrorMessages, Message, ResourceError, LOGIN_REQUIRED};

const ME: ErrorMessages = ErrorMessages::new(Message::ServerOr("Could not load your profile."))
    .on(&[(401, LOGIN_REQUIRED)])
    .network("Check your network connection.");

const REFRESH: ErrorMessages =
    ErrorMessages::new(Message::Fixed("Your session has expired. Please log in again."));

const LOGOUT: ErrorMessages = ErrorMessages::new(Message::ServerOr("Logout failed."));

const AGREEMENT: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("Could not save your agreement."))
        .on(&[(401, LOGIN_REQUIRED)])
        .accepted("Agreement saved.");

/// Minimal user reference returned by account updates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Backend user ID.
    pub user_id: i64,
    /// Display name.
    pub nickname: String,
}

/// Session and account endpoints.
#[derive(Clone, Copy, Debug)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetches the signed-in user without mapping failures to messages.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the call fails or the body is not an envelope.
    pub async fn current_user(&self) -> Result<Envelope<UserProfile>, ResourceError> {
        self.client
            .fetch_envelope(HttpRequest::builder(HttpMethod::Get, "/users/me"))
            .await
    }

    /// `GET /users/me`
    pub async fn me(&self) -> ApiResult<UserProfile> {
        let outcome = self.current_user().await.map(|envelope| ME.accept(envelope));
        ME.settle("auth.me", outcome)
    }

    /// `POST /auth/refresh`
    ///
    /// Exchanges the refresh cookie for a new access cookie. The call opts out
    /// of refresh-on-401, and a 401 here clears the session.
    pub async fn refresh(&self) -> ApiResult<()> {
        let request = HttpRequest::builder(HttpMethod::Post, self.client.refresh_path())
            .json(serde_json::json!({}))
            .skip_auth_refresh(true);
        let outcome = self
            .client
            .fetch(request)
            .await
            .map(|_| ApiResult::ok(None, None));
        REFRESH.settle("auth.refresh", outcome)
    }

    /// `POST /auth/logout`
    ///
    /// The server deletes the session cookies.
    pub async fn logout(&self) -> ApiResult<()> {
        let outcome = self
            .client
            .fetch(HttpRequest::builder(HttpMethod::Post, "/auth/logout"))
            .await
            .map(|_| ApiResult::ok(None, None));
        LOGOUT.settle("auth.logout", outcome)
    }

    /// `PUT /users/me/agreement`
    ///
    /// Records that the user accepted the terms of service.
    pub async fn update_agreement(&self) -> ApiResult<UserSummary> {
        let outcome = self
            .client
            .fetch_envelope(HttpRequest::builder(HttpMethod::Put, "/users/me/agreement"))
            .await
            .map(|envelope| AGREEMENT.accept(envelope));
        AGREEMENT.settle("auth.update_agreement", outcome)
    }
}
