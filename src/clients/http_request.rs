//! HTTP request types for the BanThing client.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the BanThing API.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the BanThing API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and triggering actions.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Content of a single multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartContent {
    /// A JSON document sent with `application/json`.
    Json(serde_json::Value),
    /// A file upload.
    File {
        /// File name reported to the server.
        file_name: String,
        /// MIME type of the file (e.g., `image/png`).
        mime_type: String,
        /// Raw file contents.
        bytes: Vec<u8>,
    },
}

/// A named part of a multipart form body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartPart {
    /// The form field name.
    pub name: String,
    /// The part content.
    pub content: PartContent,
}

/// A multipart form body.
///
/// Parts are kept as plain data so a request can be replayed after a session
/// refresh; the `reqwest` form is rebuilt on every send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartBody {
    parts: Vec<MultipartPart>,
}

impl MultipartBody {
    /// Creates an empty multipart body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a JSON part.
    #[must_use]
    pub fn json(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            content: PartContent::Json(value),
        });
        self
    }

    /// Adds a file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            content: PartContent::File {
                file_name: file_name.into(),
                mime_type: mime_type.into(),
                bytes,
            },
        });
        self
    }

    /// Returns the parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    /// Builds a `reqwest` multipart form from the parts.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidPart`] if a MIME type cannot be parsed.
    pub fn to_form(&self) -> Result<reqwest::multipart::Form, InvalidHttpRequestError> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            let invalid = |e: reqwest::Error| InvalidHttpRequestError::InvalidPart {
                name: part.name.clone(),
                reason: e.to_string(),
            };
            let built = match &part.content {
                PartContent::Json(value) => reqwest::multipart::Part::text(value.to_string())
                    .mime_str("application/json")
                    .map_err(invalid)?,
                PartContent::File {
                    file_name,
                    mime_type,
                    bytes,
                } => reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(invalid)?,
            };
            form = form.part(part.name.clone(), built);
        }
        Ok(form)
    }
}

/// The body of an HTTP request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// A JSON document (`application/json`).
    Json(serde_json::Value),
    /// A multipart form (`multipart/form-data`).
    Multipart(MultipartBody),
}

impl RequestBody {
    /// Returns the MIME type of this body.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Multipart(_) => "multipart/form-data",
        }
    }
}

/// An HTTP request to be sent to the BanThing API.
///
/// Requests carry two flags used by the session-refresh logic:
/// `skip_auth_refresh` opts the request out of refresh handling, and `retried`
/// records that the request has already been replayed after a refresh.
///
/// # Example
///
/// ```rust
/// use banthing_client::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/meetings/7/comments")
///     .json(json!({"content": "I'll bring bags"}))
///     .build()
///     .unwrap();
///
/// assert!(!request.retried);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path (relative to the base URL) for this request.
    pub path: String,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Query parameters to append to the URL.
    pub query: Option<HashMap<String, String>>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// When set, a 401 response is returned as-is without attempting a refresh.
    pub skip_auth_refresh: bool,
    /// Set once the request has been replayed after a refresh.
    pub retried: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `path` is empty
    /// - `path` is an absolute URL
    /// - a GET request carries a body
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if self.path.contains("://") {
            return Err(InvalidHttpRequestError::AbsolutePath {
                path: self.path.clone(),
            });
        }

        if self.http_method == HttpMethod::Get && self.body.is_some() {
            return Err(InvalidHttpRequestError::BodyNotAllowed {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Returns `true` if this request targets `path`.
    ///
    /// Leading and trailing slashes are ignored on both sides.
    #[must_use]
    pub fn targets(&self, path: &str) -> bool {
        normalize(&self.path) == normalize(path)
    }
}

fn normalize(path: &str) -> &str {
    path.trim().trim_matches('/')
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<RequestBody>,
    query: Option<HashMap<String, String>>,
    extra_headers: Option<HashMap<String, String>>,
    skip_auth_refresh: bool,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: None,
            extra_headers: None,
            skip_auth_refresh: false,
        }
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(RequestBody::Json(body.into()));
        self
    }

    /// Sets a multipart request body.
    #[must_use]
    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = Some(RequestBody::Multipart(body));
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Opts the request out of refresh-on-401 handling.
    #[must_use]
    pub const fn skip_auth_refresh(mut self, skip: bool) -> Self {
        self.skip_auth_refresh = skip;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
            skip_auth_refresh: self.skip_auth_refresh,
            retried: false,
        };
        request.verify()?;
        Ok(request)
    }
}
