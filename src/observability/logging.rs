//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured filter
//! - Installing twice is not an error; the first subscriber stays

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the filter: `RUST_LOG` if set and valid, else the configured directive.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Install the global subscriber. Returns `false` if one was already installed.
pub fn init(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = ObservabilityConfig::default();
        init(&config);
        assert!(!init(&config));
    }
}
