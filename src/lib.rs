//! Minimal HTTP routing and dispatch library.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use app::{Application, ServerError};
pub use config::schema::WizardConfig;
pub use dispatch::{Dispatcher, Handler, HandlerError, IntoOutput, Json, Output};
pub use http::{HttpServer, Outcome, Request, Response};
pub use lifecycle::Shutdown;
pub use routing::Method;
