//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, body buffering)
//!     → request.rs (read-only Request view)
//!     → [dispatcher picks handler, handler mutates Response view]
//!     → response.rs (Outcome: status + headers + body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, RequestBuilder, RequestUuid, X_REQUEST_ID};
pub use response::{Outcome, Response};
pub use server::HttpServer;
