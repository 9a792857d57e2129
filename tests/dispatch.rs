//! Dispatch properties exercised through the public registration API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{Method as HttpMethod, StatusCode};
use wizard::config::BodyPolicy;
use wizard::dispatch::NOT_FOUND_BODY;
use wizard::{Application, Dispatcher, HandlerError, Request, Response, WizardConfig};

fn request(method: HttpMethod, path: &str) -> Request {
    Request::builder(method, path).build().unwrap()
}

type Reply = Result<&'static str, HandlerError>;

fn counting(
    counter: &Arc<AtomicUsize>,
    reply: &'static str,
) -> impl Fn(&Request, &mut Response) -> Reply + Send + Sync + 'static {
    let counter = Arc::clone(counter);
    move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(reply)
    }
}

#[test]
fn registered_handler_runs_exactly_once_per_dispatch() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut app = Application::new();
    app.post("/orders", counting(&hits, "created"));
    let dispatcher = app.into_dispatcher();

    let outcome = dispatcher.dispatch(request(HttpMethod::POST, "/orders"));

    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.body_str(), Some("created"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn unregistered_pairs_are_404_without_invoking_anything() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut app = Application::new();
    app.get("/users", counting(&hits, "users"));
    let dispatcher = app.into_dispatcher();

    for (method, path) in [
        (HttpMethod::POST, "/users"),
        (HttpMethod::GET, "/users/"),
        (HttpMethod::GET, "/Users"),
        (HttpMethod::GET, "/nothing-here"),
    ] {
        let outcome = dispatcher.dispatch(request(method, path));
        assert_eq!(outcome.status, StatusCode::NOT_FOUND);
        assert_eq!(outcome.body_str(), Some(NOT_FOUND_BODY));
    }

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn reregistration_replaces_the_previous_handler() {
    let old_hits = Arc::new(AtomicUsize::new(0));
    let new_hits = Arc::new(AtomicUsize::new(0));
    let mut app = Application::new();
    app.get("/version", counting(&old_hits, "v1"));
    app.get("/version", counting(&new_hits, "v2"));
    assert_eq!(app.routes().len(), 1);

    let dispatcher = app.into_dispatcher();
    for _ in 0..3 {
        let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/version"));
        assert_eq!(outcome.body_str(), Some("v2"));
    }

    assert_eq!(old_hits.load(Ordering::SeqCst), 0);
    assert_eq!(new_hits.load(Ordering::SeqCst), 3);
}

#[test]
fn reconciliation_rules() {
    let mut app = Application::new();
    app.get("/default-status", |_, _| Ok(()))
        .get("/return-only", |_, _| Ok("OK"))
        .get("/explicit-only", |_, res| {
            res.set_body("X");
            Ok(())
        })
        .get("/both", |_, res| {
            res.set_body("X");
            Ok("Y")
        });
    let dispatcher = app.into_dispatcher();

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/default-status"));
    assert_eq!(outcome.status, StatusCode::OK);
    assert!(outcome.body.is_empty());

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/return-only"));
    assert_eq!(outcome.body_str(), Some("OK"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/explicit-only"));
    assert_eq!(outcome.body_str(), Some("X"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/both"));
    assert_eq!(outcome.body_str(), Some("YX"));
}

#[test]
fn prefer_explicit_policy_keeps_only_the_explicit_body() {
    let mut config = WizardConfig::default();
    config.dispatch.body_policy = BodyPolicy::PreferExplicit;
    let mut app = Application::with_config(config);
    app.get("/both", |_, res| {
        res.set_body("X");
        Ok("Y")
    });

    let outcome = app.into_dispatcher().dispatch(request(HttpMethod::GET, "/both"));
    assert_eq!(outcome.body_str(), Some("X"));
}

#[test]
fn failures_map_to_statuses_instead_of_escaping() {
    let mut app = Application::new();
    app.get("/missing", |_, _| -> Result<(), HandlerError> {
        Err(HandlerError::not_found("no such widget"))
    })
    .get("/broken", |_, _| -> Result<(), HandlerError> {
        Err(HandlerError::internal("database password is hunter2"))
    })
    .get("/panics", |_, _| -> Result<(), HandlerError> { panic!("boom") })
    .get("/io", |_, _| -> Result<(), HandlerError> {
        Err(HandlerError::from(std::io::Error::other("disk on fire")))
    });
    let dispatcher = app.into_dispatcher();

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/missing"));
    assert_eq!(outcome.status, StatusCode::NOT_FOUND);
    assert_eq!(outcome.body_str(), Some("no such widget"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/broken"));
    assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!outcome.body_str().unwrap_or_default().contains("hunter2"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/panics"));
    assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/io"));
    assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);

    // The dispatcher stays usable after every failure above.
    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/missing"));
    assert_eq!(outcome.status, StatusCode::NOT_FOUND);
}

#[test]
fn templates_capture_segments_and_yield_to_exact_routes() {
    let mut app = Application::new();
    app.get("/users/{id}", |req, _| Ok(format!("user {}", req.param("id").unwrap_or("?"))))
        .get("/users/me", |_, _| Ok("me"))
        .get("/users/{id}/posts/{post}", |req, _| {
            Ok(format!(
                "{}:{}",
                req.param("id").unwrap_or("?"),
                req.param("post").unwrap_or("?")
            ))
        });
    let dispatcher = app.into_dispatcher();

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/users/42"));
    assert_eq!(outcome.body_str(), Some("user 42"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/users/me"));
    assert_eq!(outcome.body_str(), Some("me"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/users/7/posts/9"));
    assert_eq!(outcome.body_str(), Some("7:9"));

    let outcome = dispatcher.dispatch(request(HttpMethod::GET, "/users/"));
    assert_eq!(outcome.status, StatusCode::NOT_FOUND);
}

#[test]
fn concurrent_dispatch_against_a_frozen_table() {
    const WORKERS: usize = 8;
    const PER_WORKER: usize = 250;

    let hits = Arc::new(AtomicUsize::new(0));
    let mut app = Application::new();
    app.get("/echo/{n}", {
        let hits = Arc::clone(&hits);
        move |req: &Request, res: &mut Response| {
            hits.fetch_add(1, Ordering::SeqCst);
            res.set_status(StatusCode::ACCEPTED);
            Ok(req.param("n").unwrap_or_default().to_owned())
        }
    });
    let dispatcher: Dispatcher = app.into_dispatcher();

    std::thread::scope(|scope| {
        for worker in 0..WORKERS {
            let dispatcher = &dispatcher;
            scope.spawn(move || {
                for i in 0..PER_WORKER {
                    let n = worker * PER_WORKER + i;
                    let outcome =
                        dispatcher.dispatch(request(HttpMethod::GET, &format!("/echo/{n}")));
                    assert_eq!(outcome.status, StatusCode::ACCEPTED);
                    assert_eq!(outcome.body_str(), Some(n.to_string().as_str()));

                    let miss = dispatcher.dispatch(request(HttpMethod::DELETE, "/echo/1"));
                    assert_eq!(miss.status, StatusCode::NOT_FOUND);
                }
            });
        }
    });

    assert_eq!(hits.load(Ordering::SeqCst), WORKERS * PER_WORKER);
}
