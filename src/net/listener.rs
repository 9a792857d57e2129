//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse the configured bind address
//! - Bind the TCP listener
//! - Report bind failures with the address that failed

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured address is not a socket address.
    #[error("Invalid bind address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address: SocketAddr =
        config
            .bind_address
            .parse()
            .map_err(|source| ListenerError::InvalidAddress {
                address: config.bind_address.clone(),
                source,
            })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind { address, source })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ListenerError::Bind { address, source })?;

    tracing::info!(
        address = %local_addr,
        "Listener bound"
    );

    Ok(listener)
}
