//! Response view and the finished outcome handed to the transport.
//!
//! # Responsibilities
//! - Give handlers a mutable status, header map and explicit body slot
//! - Carry the reconciled status and body back to the transport
//!
//! # Design Decisions
//! - Status reads as 200 until a handler sets it
//! - The explicit body slot is optional; "never set" differs from "set to empty"
//! - Content type falls back to plain text when nobody chose one

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;

/// Default content type when neither the handler nor its output picked one.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Write-mostly view a handler mutates while processing a request.
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status; 200 when never set.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// The explicitly set body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    /// Drop any explicitly set body.
    pub fn clear_body(&mut self) {
        self.body = None;
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Set a response header, replacing previous values.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, Option<Bytes>) {
        (self.status(), self.headers, self.body)
    }
}

/// Final status, headers and assembled body of one dispatched request.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Outcome {
    /// A plain-text outcome, used for responses the dispatcher produces itself.
    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Body as UTF-8, when it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
