//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (Application::run):
//!     Validate config → Build runtime → Bind listener → Freeze routes → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger received → Stop accepting → Drain in-flight requests → Return
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
