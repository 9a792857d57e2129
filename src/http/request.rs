//! Request view and request ID generation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Wrap the transport request in a read-only view for handlers
//! - Offer opaque body access (bytes, text, JSON)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The body is fully buffered before the handler runs; handlers never block on I/O
//! - Path captures are attached by the dispatcher after lookup

use axum::body::Bytes;
use axum::http::{self, HeaderMap, HeaderName, HeaderValue, Uri};
use serde::de::DeserializeOwned;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::dispatch::HandlerError;
use crate::routing::{Method, PathParams};

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Read-only view of an incoming request.
#[derive(Debug, Clone)]
pub struct Request {
    method: http::Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: PathParams,
}

impl Request {
    /// Build a view from transport parts and an already buffered body.
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: PathParams::default(),
        }
    }

    /// Start building a request by hand, e.g. to drive a dispatcher directly.
    pub fn builder(method: http::Method, uri: &str) -> RequestBuilder {
        RequestBuilder {
            inner: http::Request::builder().method(method).uri(uri),
            body: Bytes::new(),
        }
    }

    pub(crate) fn with_params(mut self, params: PathParams) -> Self {
        self.params = params;
        self
    }

    /// The request method as received.
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// The method as a routable [`Method`], if it is one.
    pub fn route_method(&self) -> Option<Method> {
        Method::from_http(&self.method)
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The path component of the URI, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// First value of header `name` (case-insensitive), if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value captured by a `{name}` template segment.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// The request ID assigned by the transport, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID.as_str())
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8. Invalid UTF-8 is a client error (400).
    pub fn text(&self) -> Result<&str, HandlerError> {
        std::str::from_utf8(&self.body)
            .map_err(|e| HandlerError::bad_request(format!("Request body is not valid UTF-8: {e}")))
    }

    /// Body decoded as JSON. Malformed input is a client error (400).
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HandlerError::bad_request(format!("Invalid JSON body: {e}")))
    }
}

/// Builder returned by [`Request::builder`].
#[derive(Debug)]
pub struct RequestBuilder {
    inner: http::request::Builder,
    body: Bytes,
}

impl RequestBuilder {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.inner = self.inner.header(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Fails if the URI or a header was invalid.
    pub fn build(self) -> Result<Request, http::Error> {
        let (parts, ()) = self.inner.body(())?.into_parts();
        Ok(Request::from_parts(parts, self.body))
    }
}
