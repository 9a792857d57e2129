//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the framework.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for an application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WizardConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Runtime sizing (async workers, blocking handler threads).
    pub runtime: RuntimeConfig,

    /// Dispatch behaviour.
    pub dispatch: DispatchConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8090").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8090".to_string(),
        }
    }
}

/// Tokio runtime sizing used by `Application::run`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Async worker threads; defaults to the number of CPU cores.
    pub worker_threads: Option<usize>,

    /// Upper bound on threads running handlers concurrently.
    pub max_blocking_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_blocking_threads: 512,
        }
    }
}

/// How a returned value and an explicitly set body are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPolicy {
    /// Write the returned value, then the explicit body.
    #[default]
    Concatenate,
    /// The explicit body replaces the returned value.
    PreferExplicit,
}

/// Dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Double-body reconciliation policy.
    pub body_policy: BodyPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            body_policy: BodyPolicy::Concatenate,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence when set.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "wizard=info,tower_http=info".to_string(),
        }
    }
}
