//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → TraceLayer spans per HTTP request (re-entered on the dispatch worker)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber to stdout, filtered)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the span and the `x-request-id` header
//! - Library code only emits events; the binary decides where they go

pub mod logging;
