//! Integration tests for session refresh in the authenticated gateway.
//!
//! A mock backend answers 401 until the request carries the cookie set by
//! the refresh endpoint, the same way the real backend validates its
//! HTTP-only access cookie.

use std::sync::Arc;
use std::time::Duration;

use banthing_client::clients::{HttpError, HttpMethod, HttpRequest};
use banthing_client::{ApiClient, BanthingConfig, BaseUrl, SessionStore, UserProfile};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRESH_COOKIE: &str = "accessToken=fresh";

fn client_for(server: &MockServer, session: &Arc<SessionStore>) -> ApiClient {
    let config = BanthingConfig::builder()
        .base_url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
        .build()
        .unwrap();
    ApiClient::new(&config, Arc::clone(session)).unwrap()
}

fn signed_in_session() -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::new());
    let user: UserProfile =
        serde_json::from_value(json!({"userId": 7, "nickname": "kim"})).unwrap();
    session.set_user(Some(user));
    session
}

fn me_body() -> serde_json::Value {
    json!({"success": true, "message": "ok", "data": {"userId": 7, "nickname": "kim"}})
}

fn get_me() -> HttpRequest {
    HttpRequest::builder(HttpMethod::Get, "/users/me")
        .build()
        .unwrap()
}

async fn mount_refresh(server: &MockServer, delay: Duration, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("Set-Cookie", "accessToken=fresh; Path=/; HttpOnly")
                .set_delay(delay),
        )
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// Transparent success
// ============================================================================

#[tokio::test]
async fn test_successful_response_is_returned_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 0).await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let response = client.send(get_me()).await.unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.body, me_body());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_non_401_errors_are_not_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 0).await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let error = client.send(get_me()).await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert!(session.is_authenticated());
}

// ============================================================================
// Refresh and replay
// ============================================================================

#[tokio::test]
async fn test_401_refreshes_and_replays_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("cookie", FRESH_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 1).await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let response = client.send(get_me()).await.unwrap();

    assert_eq!(response.code, 200);
    assert!(session.is_authenticated());
    assert!(!client.refresh_in_flight());
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("cookie", FRESH_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::from_millis(300), 1).await;

    let session = signed_in_session();
    let client = Arc::new(client_for(&server, &session));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.send(get_me()).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.code, 200);
    }

    assert!(session.is_authenticated());
    assert!(!client.refresh_in_flight());
}

#[tokio::test]
async fn test_replay_401_clears_session_without_second_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 1).await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let error = client.send(get_me()).await.unwrap_err();

    assert!(error.is_unauthorized());
    let state = session.state();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(state.has_checked_auth);
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let error = client.send(get_me()).await.unwrap_err();

    match error {
        HttpError::RefreshFailed(cause) => assert_eq!(cause.status(), Some(401)),
        other => panic!("expected RefreshFailed, got {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_aborted_refresh_owner_does_not_sign_out_waiters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("cookie", FRESH_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::from_millis(800), 2).await;

    let session = signed_in_session();
    let client = Arc::new(client_for(&server, &session));

    let owner = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send(get_me()).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(client.refresh_in_flight());

    let waiter = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send(get_me()).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;

    owner.abort();
    assert!(owner.await.unwrap_err().is_cancelled());

    let response = waiter.await.unwrap().unwrap();

    assert_eq!(response.code, 200);
    assert!(session.is_authenticated());
    assert!(!client.refresh_in_flight());
}

// ============================================================================
// Opt-out and refresh endpoint immunity
// ============================================================================

#[tokio::test]
async fn test_skip_auth_refresh_propagates_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, Duration::ZERO, 0).await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let request = HttpRequest::builder(HttpMethod::Get, "/users/me")
        .skip_auth_refresh(true)
        .build()
        .unwrap();
    let error = client.send(request).await.unwrap_err();

    assert!(error.is_unauthorized());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_401_from_refresh_endpoint_clears_without_refreshing_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session();
    let client = client_for(&server, &session);

    let result = client.auth().refresh().await;

    assert!(!result.success);
    assert_eq!(
        result.message.as_deref(),
        Some("Your session has expired. Please log in again.")
    );
    assert!(!session.is_authenticated());
}
