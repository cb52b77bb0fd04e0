//! Network transport using reqwest.
//!
//! This adapter implements the `Transport` port against a service reachable over HTTP.
//! Request paths are appended to a base URL, so a base of `http://localhost:3000/api`
//! sends `/users/7` to `http://localhost:3000/api/users/7`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use docspec_application::ports::{Transport, TransportError, TransportRequest, TransportResponse};
use docspec_domain::{HttpMethod, RunnerSettings};
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport for the service at `base_url`.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: "docspec/0.1.0"
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the client cannot be
    /// created.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("docspec/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Self::with_client(client, base_url)
    }

    /// Creates a transport with a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, TransportError> {
        Url::parse(base_url).map_err(|e| TransportError::InvalidUrl(format!("{e}: {base_url}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    /// Creates a transport from runner settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is configured or it is invalid.
    pub fn from_settings(settings: &RunnerSettings) -> Result<Self, TransportError> {
        let base_url = settings
            .base_url
            .as_deref()
            .ok_or_else(|| TransportError::InvalidUrl("base URL is not configured".to_string()))?;
        Ok(Self::new(base_url)?.with_timeout(settings.timeout_ms))
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Joins the base URL, the resolved path and the encoded query.
    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, TransportError> {
        let raw = format!("{}{path}", self.base_url);
        let mut url =
            Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{e}: {raw}")))?;

        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return TransportError::Connection(error.to_string());
        }
        if error.is_builder() {
            return TransportError::InvalidRequest(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.build_url(&request.path, &request.query)?;
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(Duration::from_millis(self.timeout_ms));

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // `json` sets Content-Type unless a header already did.
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(status, bytes = bytes.len(), "received response");
        Ok(TransportResponse::from_raw(status, headers, &bytes))
    }
}
