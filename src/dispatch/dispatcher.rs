//! Request dispatch.
//!
//! # Responsibilities
//! - Look up the route for an incoming request
//! - Invoke the matched handler exactly once
//! - Reconcile the handler's return value with the response it mutated
//! - Produce the final status and body for the transport
//!
//! # Design Decisions
//! - Route miss is answered locally: 404 with body `Not found`
//! - Handler errors and panics stop at this boundary and become error statuses
//!   (500 unless the error carries another); other requests are unaffected
//! - The route table is owned and never mutated after construction, so
//!   `dispatch` takes `&self` and is safe to call from many threads at once
//! - Fully synchronous: `dispatch` blocks its caller for the handler's duration

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};

use crate::config::BodyPolicy;
use crate::dispatch::{HandlerError, Output};
use crate::http::response::{Outcome, TEXT_PLAIN};
use crate::http::{Request, Response};
use crate::routing::RouteTable;

/// Body written on a route miss.
pub const NOT_FOUND_BODY: &str = "Not found";

/// Matches requests to handlers and turns their results into outcomes.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    body_policy: BodyPolicy,
}

impl Dispatcher {
    /// Freeze `routes` into a dispatcher.
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            body_policy: BodyPolicy::default(),
        }
    }

    pub fn with_body_policy(mut self, body_policy: BodyPolicy) -> Self {
        self.body_policy = body_policy;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn body_policy(&self) -> BodyPolicy {
        self.body_policy
    }

    /// Handle one request from lookup to finished outcome.
    pub fn dispatch(&self, request: Request) -> Outcome {
        let found = request
            .route_method()
            .and_then(|method| self.routes.lookup(method, request.path()));

        let Some(found) = found else {
            tracing::debug!(
                method = %request.method(),
                path = %request.path(),
                "No route matched"
            );
            return Outcome::text(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
        };

        let handler = found.handler;
        let request = request.with_params(found.params);
        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            "Dispatching request"
        );

        let mut response = Response::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.handle(&request, &mut response)
        }));

        match result {
            Ok(Ok(output)) => self.reconcile(output, response),
            Ok(Err(error)) => handler_failed(&request, error),
            Err(payload) => {
                tracing::error!(
                    method = %request.method(),
                    path = %request.path(),
                    panic = %panic_message(payload.as_ref()),
                    "Handler panicked"
                );
                Outcome::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    /// Combine the return channel and the explicit body into the final outcome.
    fn reconcile(&self, output: Output, response: Response) -> Outcome {
        let (status, mut headers, explicit) = response.into_parts();
        let (returned, returned_type) = match output {
            Output::Nothing => (None, None),
            Output::Value { body, content_type } => (Some(body), Some(content_type)),
        };

        let (body, content_type) = match (returned, explicit) {
            (None, None) => (Bytes::new(), None),
            (None, Some(explicit)) => (explicit, None),
            (Some(returned), None) => (returned, returned_type),
            (Some(returned), Some(explicit)) => match self.body_policy {
                BodyPolicy::Concatenate => {
                    let mut joined = Vec::with_capacity(returned.len() + explicit.len());
                    joined.extend_from_slice(&returned);
                    joined.extend_from_slice(&explicit);
                    // The joined bytes are no longer valid in the returned value's format.
                    (Bytes::from(joined), None)
                }
                BodyPolicy::PreferExplicit => (explicit, None),
            },
        };

        if !headers.contains_key(header::CONTENT_TYPE) {
            let value = HeaderValue::from_static(content_type.unwrap_or(TEXT_PLAIN));
            headers.insert(header::CONTENT_TYPE, value);
        }

        Outcome {
            status,
            headers,
            body,
        }
    }
}

fn handler_failed(request: &Request, error: HandlerError) -> Outcome {
    let status = error.status();
    if status.is_server_error() {
        tracing::warn!(
            method = %request.method(),
            path = %request.path(),
            request_id = request.request_id().unwrap_or("unknown"),
            status = status.as_u16(),
            error = %error,
            "Handler failed"
        );
    } else {
        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            status = status.as_u16(),
            error = %error,
            "Handler rejected request"
        );
    }
    Outcome::text(status, error.public_message())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
