//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WizardConfig (validated, immutable)
//!     → handed to Application at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs (or none at all)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BodyPolicy, DispatchConfig, ListenerConfig, ObservabilityConfig, RuntimeConfig,
    TimeoutConfig, WizardConfig,
};
pub use validation::{validate_config, ValidationError};
