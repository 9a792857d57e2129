//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     Application::get/post/... (method, path, handler)
//!     → router.rs (insert or replace in RouteTable)
//!     → matcher.rs (compile `{param}` templates)
//!
//! Incoming request (method, path):
//!     → key.rs (map transport method to routable Method)
//!     → router.rs (exact lookup, then template fallback)
//!     → Return: RouteMatch or miss
//! ```
//!
//! # Design Decisions
//! - Table frozen once handed to the Dispatcher, read without locks afterwards
//! - Deterministic: same input always matches same route
//! - Last registration for a key wins

pub mod key;
pub mod matcher;
pub mod router;

pub use key::{Method, RouteKey, UnsupportedMethod};
pub use matcher::{PathParams, PathPattern};
pub use router::{RouteMatch, RouteTable};
