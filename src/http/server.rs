//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router that forwards every request to the dispatcher
//! - Wire up middleware (request ID, tracing, timeout, server header)
//! - Buffer request bodies up to the configured limit
//! - Run the synchronous dispatcher on a blocking worker per request
//! - Bind server to listener and shut down gracefully

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::WizardConfig;
use crate::dispatch::Dispatcher;
use crate::http::request::{Request, RequestUuid};
use crate::http::response::Outcome;

/// State injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// HTTP transport bound to one dispatcher.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given dispatcher and configuration.
    pub fn new(dispatcher: Arc<Dispatcher>, config: &WizardConfig) -> Self {
        let router = Self::build_router(config, AppState { dispatcher });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &WizardConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::SERVER,
                HeaderValue::from_static("wizard"),
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        Router::new()
            .fallback(dispatch_request)
            .layer(DefaultBodyLimit::max(config.dispatch.max_body_size))
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router, e.g. to drive it with `tower::ServiceExt::oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every request lands here; the dispatcher owns all routing decisions.
async fn dispatch_request(
    State(state): State<AppState>,
    parts: Parts,
    body: Bytes,
) -> axum::response::Response {
    let request = Request::from_parts(parts, body);
    let dispatcher = Arc::clone(&state.dispatcher);
    let span = tracing::Span::current();

    let outcome = tokio::task::spawn_blocking(move || {
        span.in_scope(|| dispatcher.dispatch(request))
    })
    .await;

    match outcome {
        Ok(outcome) => outcome.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch worker failed");
            Outcome::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::HandlerError;
    use crate::http::Response;
    use crate::routing::{Method, RouteTable};
    use axum::body::{to_bytes, Body};
    use tower::ServiceExt;

    fn echo(req: &Request, res: &mut Response) -> Result<String, HandlerError> {
        res.set_status(StatusCode::CREATED);
        Ok(req.text()?.to_uppercase())
    }

    fn server(config: &WizardConfig) -> HttpServer {
        let mut routes = RouteTable::new();
        routes.register(Method::Post, "/echo", echo);
        routes.register(Method::Get, "/slow", |_: &Request, _: &mut Response| {
            std::thread::sleep(Duration::from_millis(1500));
            Ok::<_, HandlerError>("finally")
        });
        HttpServer::new(Arc::new(Dispatcher::new(routes)), config)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn forwards_to_dispatcher() {
        let app = server(&WizardConfig::default()).router();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from("shout"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers().get(header::SERVER).unwrap(), "wizard");
        assert_eq!(body_string(response).await, "SHOUT");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = server(&WizardConfig::default()).router();
        let request = axum::http::Request::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Not found");
    }

    #[tokio::test]
    async fn slow_handler_times_out() {
        let mut config = WizardConfig::default();
        config.timeouts.request_secs = 1;
        let app = server(&config).router();
        let request = axum::http::Request::builder()
            .uri("/slow")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = WizardConfig::default();
        config.dispatch.max_body_size = 4;
        let app = server(&config).router();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from("far too long"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn incoming_request_id_is_kept() {
        let app = server(&WizardConfig::default()).router();
        let request = axum::http::Request::builder()
            .uri("/missing")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }
}
