//! Authenticated request gateway.
//!
//! [`ApiClient`] sends every request through the [`HttpClient`] transport and
//! recovers from an expired session: a 401 triggers one shared refresh call,
//! after which the original request is replayed once.
//!
//! # Recovery rules
//!
//! For a failed request the gateway applies, in order:
//!
//! 1. No status (network failure) or a status other than 401: return the error.
//! 2. 401 from the refresh endpoint itself: clear the session, return the error.
//! 3. 401 on a request built with `skip_auth_refresh`: return the error.
//! 4. 401 on a request that was already replayed: clear the session, return
//!    the error.
//! 5. Otherwise refresh (joining a refresh already in flight) and replay.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use banthing_client::{ApiClient, BanthingConfig, SessionStore};
//! use banthing_client::clients::{HttpMethod, HttpRequest};
//!
//! let config = BanthingConfig::from_env()?;
//! let session = Arc::new(SessionStore::new());
//! let client = ApiClient::new(&config, Arc::clone(&session))?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/users/me").build()?;
//! let response = client.send(request).await?;
//! println!("{}", response.body);
//! ```

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::clients::errors::HttpError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::refresh::{RefreshCoordinator, RefreshOutcome};
use crate::config::BanthingConfig;

/// What the gateway does with a failed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Return the error to the caller unchanged.
    Propagate,
    /// Clear the session, then return the error.
    ClearAndPropagate,
    /// Refresh the session and replay the request.
    Refresh,
}

impl Recovery {
    /// Decides how to handle `error` for `request`.
    ///
    /// This is a pure function of the request flags, the error status and the
    /// refresh endpoint path.
    ///
    /// The refresh-path check runs before `skip_auth_refresh`. The BanThing
    /// web client's interceptor checks the opt-out first; here a 401 from a
    /// direct refresh call also clears the session.
    #[must_use]
    pub fn decide(request: &HttpRequest, error: &HttpError, refresh_path: &str) -> Self {
        if !error.is_unauthorized() {
            return Self::Propagate;
        }
        if request.targets(refresh_path) {
            return Self::ClearAndPropagate;
        }
        if request.skip_auth_refresh {
            return Self::Propagate;
        }
        if request.retried {
            return Self::ClearAndPropagate;
        }
        Self::Refresh
    }
}

/// Authenticated client for the BanThing API.
///
/// Credentials live in the transport's cookie jar; callers never attach
/// tokens. A 401 is recovered transparently through a single-flight refresh
/// shared by every request issued through the same `ApiClient`.
///
/// `ApiClient` is `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct ApiClient {
    http: Arc<HttpClient>,
    session: Arc<SessionStore>,
    refresh: RefreshCoordinator,
    refresh_path: String,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a client for `config`, clearing `session` when the login is lost.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the transport cannot be created.
    pub fn new(config: &BanthingConfig, session: Arc<SessionStore>) -> Result<Self, HttpError> {
        let http = HttpClient::new(config)?;
        Ok(Self::with_http_client(
            Arc::new(http),
            session,
            config.refresh_path(),
        ))
    }

    /// Creates a client around an existing transport.
    #[must_use]
    pub fn with_http_client(
        http: Arc<HttpClient>,
        session: Arc<SessionStore>,
        refresh_path: impl Into<String>,
    ) -> Self {
        Self {
            http,
            session,
            refresh: RefreshCoordinator::new(),
            refresh_path: refresh_path.into(),
        }
    }

    /// Returns the session store this client clears on an unrecoverable 401.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Returns the refresh endpoint path.
    #[must_use]
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    /// Returns `true` while a session refresh is in flight.
    #[must_use]
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh.in_flight()
    }

    /// Sends a request, refreshing the session and replaying once on 401.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - The request is invalid or no response is received
    /// - The response (or the replay's response) is not 2xx
    /// - The session refresh fails ([`HttpError::RefreshFailed`]); the session
    ///   store has been cleared in that case
    ///
    /// Dropping a `send` future that owns the refresh does not fail the other
    /// callers waiting on it. They start or join a new refresh instead.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        loop {
            let error = match self.http.request(&request).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            match Recovery::decide(&request, &error, &self.refresh_path) {
                Recovery::Propagate => return Err(error),
                Recovery::ClearAndPropagate => {
                    tracing::warn!(
                        path = %request.path,
                        retried = request.retried,
                        "unrecoverable 401, clearing session"
                    );
                    self.session.clear();
                    return Err(error);
                }
                Recovery::Refresh => {
                    request.retried = true;
                    if let Err(cause) = self.settled_refresh(&request.path).await {
                        tracing::warn!(
                            path = %request.path,
                            error = %cause,
                            "session refresh failed, clearing session"
                        );
                        self.session.clear();
                        return Err(HttpError::RefreshFailed(cause));
                    }

                    tracing::debug!(method = %request.http_method, path = %request.path, "replaying request");
                }
            }
        }
    }

    /// Takes or joins the shared refresh until one settles.
    ///
    /// A refresh whose owner was dropped leaves no outcome behind; the slot is
    /// already free, so the caller starts or joins the next one.
    async fn settled_refresh(&self, path: &str) -> RefreshOutcome {
        loop {
            let (outcome, role) = self.refresh.run(|| self.refresh_session()).await;
            match outcome {
                Err(cause) if matches!(*cause, HttpError::RefreshAbandoned) => {
                    tracing::debug!(path, ?role, "session refresh abandoned, retrying");
                }
                outcome => {
                    tracing::debug!(path, ?role, ok = outcome.is_ok(), "session refresh settled");
                    return outcome;
                }
            }
        }
    }

    async fn refresh_session(&self) -> Result<(), HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, self.refresh_path.as_str())
            .json(serde_json::json!({}))
            .skip_auth_refresh(true)
            .build()?;
        self.http.request(&request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpResponseError, InvalidHttpRequestError};
    use serde_json::json;

    const REFRESH: &str = "/auth/refresh";

    fn status_error(code: u16) -> HttpError {
        HttpError::Response(HttpResponseError {
            code,
            message: format!("HTTP {code}"),
            error_reference: None,
            body: json!({}),
        })
    }

    fn get(path: &str) -> HttpRequest {
        HttpRequest::builder(HttpMethod::Get, path).build().unwrap()
    }

    #[test]
    fn test_non_401_errors_propagate() {
        let request = get("/meetings/search");
        for code in [400, 403, 404, 409, 429, 500] {
            assert_eq!(
                Recovery::decide(&request, &status_error(code), REFRESH),
                Recovery::Propagate
            );
        }
    }

    #[test]
    fn test_errors_without_status_propagate() {
        let request = get("/meetings/search");
        let error = HttpError::InvalidRequest(InvalidHttpRequestError::EmptyPath);
        assert_eq!(
            Recovery::decide(&request, &error, REFRESH),
            Recovery::Propagate
        );
    }

    #[test]
    fn test_first_401_refreshes() {
        let request = get("/users/me");
        assert_eq!(
            Recovery::decide(&request, &status_error(401), REFRESH),
            Recovery::Refresh
        );
    }

    #[test]
    fn test_401_after_replay_clears_session() {
        let mut request = get("/users/me");
        request.retried = true;
        assert_eq!(
            Recovery::decide(&request, &status_error(401), REFRESH),
            Recovery::ClearAndPropagate
        );
    }

    #[test]
    fn test_skip_flag_propagates_401() {
        let request = HttpRequest::builder(HttpMethod::Get, "/users/me")
            .skip_auth_refresh(true)
            .build()
            .unwrap();
        assert_eq!(
            Recovery::decide(&request, &status_error(401), REFRESH),
            Recovery::Propagate
        );
    }

    #[test]
    fn test_refresh_endpoint_401_clears_even_when_skipped() {
        let request = HttpRequest::builder(HttpMethod::Post, REFRESH)
            .json(json!({}))
            .skip_auth_refresh(true)
            .build()
            .unwrap();
        assert_eq!(
            Recovery::decide(&request, &status_error(401), REFRESH),
            Recovery::ClearAndPropagate
        );
    }

    #[test]
    fn test_refresh_path_match_is_exact() {
        let request = get("/auth/refresh-tokens");
        assert_eq!(
            Recovery::decide(&request, &status_error(401), REFRESH),
            Recovery::Refresh
        );
    }

    #[test]
    fn test_client_exposes_refresh_path_and_session() {
        let config = BanthingConfig::builder()
            .base_url(crate::config::BaseUrl::new("https://api.example.com/api").unwrap())
            .build()
            .unwrap();
        let session = Arc::new(SessionStore::new());
        let client = ApiClient::new(&config, Arc::clone(&session)).unwrap();

        assert_eq!(client.refresh_path(), "/auth/refresh");
        assert!(Arc::ptr_eq(client.session(), &session));
        assert!(!client.refresh_in_flight());
    }
}
