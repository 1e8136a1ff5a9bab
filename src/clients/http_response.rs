//! HTTP response types for the BanThing client.

use std::collections::HashMap;

/// An HTTP response from the BanThing API.
///
/// Bodies are parsed as JSON. Empty bodies (e.g. `204 No Content`) parse as an
/// empty object, and non-JSON bodies are kept under a `raw_body` key.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lower-cased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Parses a raw response body.
    #[must_use]
    pub fn parse_body(text: &str) -> serde_json::Value {
        if text.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw_body": text }))
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the human-readable error message for this response.
    ///
    /// Prefers the body's `message` field, then `error`, then the raw body.
    #[must_use]
    pub fn error_message(&self) -> String {
        ["message", "error"]
            .iter()
            .find_map(|key| {
                self.body
                    .get(*key)
                    .and_then(serde_json::Value::as_str)
                    .filter(|m| !m.is_empty())
            })
            .map_or_else(
                || match self.body.get("raw_body").and_then(serde_json::Value::as_str) {
                    Some(raw) => raw.to_string(),
                    None => format!("HTTP {}", self.code),
                },
                str::to_string,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in [200, 201, 204, 299] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 403, 404, 409, 500] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(!response.is_ok());
        }
    }

    #[test]
    fn test_parse_body_handles_empty_and_invalid() {
        assert_eq!(HttpResponse::parse_body(""), json!({}));
        assert_eq!(HttpResponse::parse_body("  \n"), json!({}));
        assert_eq!(
            HttpResponse::parse_body("<html>oops</html>"),
            json!({"raw_body": "<html>oops</html>"})
        );
        assert_eq!(
            HttpResponse::parse_body(r#"{"success":true}"#),
            json!({"success": true})
        );
    }

    #[test]
    fn test_request_id_extraction() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);

        let response = HttpResponse::new(200, headers, json!({}));
        assert_eq!(response.request_id(), Some("abc-123"));
    }

    #[test]
    fn test_error_message_preference() {
        let response = HttpResponse::new(
            400,
            HashMap::new(),
            json!({"message": "Title is required", "error": "Bad Request"}),
        );
        assert_eq!(response.error_message(), "Title is required");

        let response = HttpResponse::new(401, HashMap::new(), json!({"error": "Unauthorized"}));
        assert_eq!(response.error_message(), "Unauthorized");

        let response = HttpResponse::new(502, HashMap::new(), json!({"raw_body": "Bad Gateway"}));
        assert_eq!(response.error_message(), "Bad Gateway");

        let response = HttpResponse::new(404, HashMap::new(), json!({}));
        assert_eq!(response.error_message(), "HTTP 404");
    }
}
