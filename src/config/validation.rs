//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sizes > 0, thread counts > 0)
//! - Check the bind address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WizardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::WizardConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Check `config`, collecting every violation.
pub fn validate_config(config: &WizardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.runtime.worker_threads == Some(0) {
        errors.push(ValidationError::NotPositive("runtime.worker_threads"));
    }
    if config.runtime.max_blocking_threads == 0 {
        errors.push(ValidationError::NotPositive("runtime.max_blocking_threads"));
    }
    if config.dispatch.max_body_size == 0 {
        errors.push(ValidationError::NotPositive("dispatch.max_body_size"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NotPositive("timeouts.request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
