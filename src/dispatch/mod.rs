//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request view (method, path, headers, body)
//!     → dispatcher.rs (route lookup, 404 on miss)
//!     → handler.rs (user handler, exactly once)
//!     → output.rs (tagged return value: Nothing | Value)
//!     → dispatcher.rs (reconcile return value with explicit body)
//!     → Outcome (status, headers, body) back to the transport
//! ```

pub mod dispatcher;
pub mod handler;
pub mod output;

pub use dispatcher::{Dispatcher, NOT_FOUND_BODY};
pub use handler::{Handler, HandlerError};
pub use output::{IntoOutput, Json, Output};
