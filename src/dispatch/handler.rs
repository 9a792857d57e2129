//! Handler contract and handler errors.

use std::error::Error as StdError;
use std::fmt;

use axum::http::StatusCode;

use crate::dispatch::output::{IntoOutput, Output};
use crate::http::{Request, Response};

/// A unit of request-processing logic.
///
/// Implemented by named types, and automatically by any closure of shape
/// `Fn(&Request, &mut Response) -> Result<R, HandlerError>` where `R: IntoOutput`.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request, response: &mut Response) -> Result<Output, HandlerError>;
}

impl<F, R> Handler for F
where
    F: Fn(&Request, &mut Response) -> Result<R, HandlerError> + Send + Sync + 'static,
    R: IntoOutput,
{
    fn handle(&self, request: &Request, response: &mut Response) -> Result<Output, HandlerError> {
        (self)(request, response)?.into_output()
    }
}

/// Error returned by a handler.
///
/// Wraps any `std::error::Error` so handlers can use `?` freely. Carries the
/// HTTP status the dispatcher answers with (500 unless chosen otherwise) and
/// an optional client-facing message. Wrapped source errors are logged but
/// never sent to the client.
pub struct HandlerError {
    status: StatusCode,
    message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl HandlerError {
    /// An error with a status and a message that is safe to show the client.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A server-side failure; the message is logged, not sent.
    pub fn internal(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
            source: Some(message.into()),
        }
    }

    /// Replace the status the dispatcher will answer with.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The body sent to the client.
    pub fn public_message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
        }
    }

    /// The wrapped error, if any.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl<E> From<E> for HandlerError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
            source: Some(Box::new(error)),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.source) {
            (Some(message), Some(source)) => write!(f, "{message}: {source}"),
            (Some(message), None) => f.write_str(message),
            (None, Some(source)) => write!(f, "{source}"),
            (None, None) => f.write_str(&self.public_message()),
        }
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}
