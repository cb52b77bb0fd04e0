//! In-process transport over a tower service.
//!
//! Drives any cloneable `tower::Service` that speaks `http` types, such as an axum
//! `Router`, without binding a socket. Each request runs against a fresh clone of the
//! service.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use docspec_application::ports::{
    ServiceHandle, Transport, TransportError, TransportRequest, TransportResponse,
};
use docspec_domain::HttpMethod;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Method, Request, Response};
use http_body_util::{BodyExt, Full};
use tower::{Service, ServiceExt};
use tracing::debug;

/// Transport that calls a tower service directly.
#[derive(Debug, Clone)]
pub struct TowerTransport<S> {
    service: S,
}

impl<S> TowerTransport<S> {
    /// Wraps `service`.
    pub const fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S> TowerTransport<S>
where
    Self: Transport + 'static,
{
    /// Wraps `service` as a shared service handle.
    pub fn handle(service: S) -> ServiceHandle {
        Arc::new(Self::new(service))
    }
}

const fn to_http_method(method: HttpMethod) -> Method {
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

/// Converts a `TransportRequest` into an `http::Request` with a JSON body.
fn build_request(request: &TransportRequest) -> Result<Request<Full<Bytes>>, TransportError> {
    let mut uri = request.path.clone();
    if !request.query.is_empty() {
        let encoded = serde_urlencoded::to_string(&request.query)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        uri.push('?');
        uri.push_str(&encoded);
    }

    let mut builder = Request::builder()
        .method(to_http_method(request.method))
        .uri(&uri);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = match &request.body {
        Some(json) => {
            let has_content_type = request
                .headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            let bytes =
                serde_json::to_vec(json).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            Full::new(Bytes::from(bytes))
        }
        None => Full::new(Bytes::new()),
    };

    builder
        .body(body)
        .map_err(|e| TransportError::InvalidRequest(format!("{e}: {uri}")))
}

#[async_trait]
impl<S, B> Transport for TowerTransport<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<B>> + Clone + Send + Sync + 'static,
    S::Future: Send,
    S::Error: fmt::Display,
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let http_request = build_request(&request)?;
        debug!(method = %request.method, uri = %http_request.uri(), "calling service in process");

        let response = self
            .service
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| TransportError::Service(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let headers: HashMap<String, String> = parts
            .headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let bytes = body
            .collect()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_bytes();

        debug!(status = parts.status.as_u16(), bytes = bytes.len(), "service responded");
        Ok(TransportResponse::from_raw(parts.status.as_u16(), headers, &bytes))
    }
}
