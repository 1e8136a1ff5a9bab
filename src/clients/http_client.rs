//! HTTP transport for BanThing API communication.
//!
//! This module provides the [`HttpClient`] type, which sends a single request
//! and parses the response. Session refresh lives one layer up, in
//! [`ApiClient`](crate::clients::ApiClient).

use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::config::{BanthingConfig, BaseUrl};

/// Client version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport for the BanThing API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including User-Agent and Accept
/// - A cookie jar carrying the HTTP-only session cookies
/// - Response parsing and error conversion
///
/// Requests are sent exactly once; there is no automatic retry.
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport with its own cookie store.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying `reqwest` client
    /// cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &BanthingConfig) -> Result<Self, HttpError> {
        Self::build(config, reqwest::Client::builder().cookie_store(true))
    }

    /// Creates a new transport sharing the given cookie jar.
    ///
    /// Useful to seed session cookies obtained elsewhere (e.g. from an OAuth
    /// login completed in a browser).
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying `reqwest` client
    /// cannot be created.
    pub fn with_cookie_jar(
        config: &BanthingConfig,
        jar: Arc<reqwest::cookie::Jar>,
    ) -> Result<Self, HttpError> {
        Self::build(config, reqwest::Client::builder().cookie_provider(jar))
    }

    fn build(
        config: &BanthingConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}BanThing Client v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let mut builder = builder.use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url().clone(),
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request once and returns the parsed response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - No response is received (`Network`)
    /// - A non-2xx response is received (`Response`)
    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                req_builder = req_builder.header(key, value);
            }
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        // multipart sets its own Content-Type with the boundary
        req_builder = match &request.body {
            Some(RequestBody::Json(value)) => req_builder.json(value),
            Some(RequestBody::Multipart(form)) => req_builder.multipart(form.to_form()?),
            None => req_builder,
        };

        tracing::debug!(method = %request.http_method, path = %request.path, "sending request");

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();
        let response = HttpResponse::new(code, headers, HttpResponse::parse_body(&body_text));

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: response.error_message(),
            error_reference: response.request_id().map(String::from),
            body: response.body,
        }))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(prefix: Option<&str>) -> BanthingConfig {
        let mut builder =
            BanthingConfig::builder().base_url(BaseUrl::new("https://api.example.com/api").unwrap());
        if let Some(prefix) = prefix {
            builder = builder.user_agent_prefix(prefix);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_client_construction_uses_base_url() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        assert_eq!(client.base_url().as_ref(), "https://api.example.com/api");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("BanThing Client v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let client = HttpClient::new(&create_test_config(Some("BanThingCli/1.0"))).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("BanThingCli/1.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_no_authorization_header_is_ever_set() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        assert!(client
            .default_headers()
            .keys()
            .all(|k| !k.eq_ignore_ascii_case("authorization")));
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_sending() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        let request = HttpRequest {
            http_method: HttpMethod::Get,
            path: String::new(),
            body: None,
            query: None,
            extra_headers: None,
            skip_auth_refresh: false,
            retried: false,
        };

        let result = client.request(&request).await;
        assert!(matches!(result, Err(HttpError::InvalidRequest(_))));
    }
}
