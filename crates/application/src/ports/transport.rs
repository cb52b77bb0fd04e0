//! Transport port
//!
//! The transport performs the actual HTTP round-trip. The core hands it a fully resolved
//! request and gets back a status and a decoded body. Only JSON responses carry a body the
//! core can validate; anything else decodes to an empty object and keeps its text for
//! diagnostics.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use docspec_domain::{HttpMethod, HttpStatus};
use serde_json::{Map, Value};
use thiserror::Error;

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path with every placeholder substituted, starting with `/`.
    pub path: String,
    /// Headers to set, in declaration order.
    pub headers: Vec<(String, String)>,
    /// Query parameters, in declaration order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl TransportRequest {
    /// Creates a request without headers, query or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

/// A response as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Response status.
    pub status: HttpStatus,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Decoded body.
    pub body: Value,
    /// Raw text of a non-JSON body, kept for diagnostics.
    pub text: Option<String>,
}

impl TransportResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: impl Into<HttpStatus>, body: Value) -> Self {
        Self {
            status: status.into(),
            headers: HashMap::new(),
            body,
            text: None,
        }
    }

    /// Builds a response from what came off the wire, decoding the body according to its
    /// `Content-Type`.
    #[must_use]
    pub fn from_raw(
        status: impl Into<HttpStatus>,
        headers: HashMap<String, String>,
        bytes: &[u8],
    ) -> Self {
        let mut response = Self::new(status, Value::Object(Map::new())).with_headers(headers);
        if is_blank(bytes) {
            return response;
        }
        let parsed = response
            .header("content-type")
            .filter(|content_type| is_json_media_type(content_type))
            .and_then(|_| serde_json::from_slice(bytes).ok());
        match parsed {
            Some(body) => response.body = body,
            None => response.text = Some(String::from_utf8_lossy(bytes).into_owned()),
        }
        response
    }

    /// Sets the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Returns a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// `application/json` or any `+json` suffix, ignoring parameters.
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Network-level failure, distinct from an assertion failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The service could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The target URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be assembled.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The in-process service returned an error instead of a response.
    #[error("service error: {0}")]
    Service(String),

    /// Any other failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for issuing HTTP requests against the service under test.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network-level failure. A response with any
    /// status is a success at this level.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Shared handle to the running service under test.
pub type ServiceHandle = Arc<dyn Transport>;
