//! wizard: a minimal routing web server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                      WIZARD                      │
//!                      │                                                  │
//!     Client Request   │  ┌─────────┐   ┌─────────┐   ┌──────────────┐    │
//!     ─────────────────┼─▶│   net   │──▶│  http   │──▶│   dispatch   │    │
//!                      │  │listener │   │ server  │   │  dispatcher  │    │
//!                      │  └─────────┘   └─────────┘   └──────┬───────┘    │
//!                      │                                     │            │
//!                      │                                     ▼            │
//!                      │                              ┌──────────────┐    │
//!                      │                              │   routing    │    │
//!                      │                              │ route table  │    │
//!                      │                              └──────┬───────┘    │
//!                      │                                     ▼            │
//!     Client Response  │  ┌─────────┐   ┌─────────┐   ┌──────────────┐    │
//!     ◀────────────────┼──│  http   │◀──│reconcile│◀──│   handler    │    │
//!                      │  │response │   │  body   │   │   (user)     │    │
//!                      │  └─────────┘   └─────────┘   └──────────────┘    │
//!                      │                                                  │
//!                      │  Cross-cutting: config, observability, lifecycle │
//!                      └──────────────────────────────────────────────────┘
//! ```
//!
//! The binary registers a handful of demonstration routes and serves them
//! on the configured address (default `0.0.0.0:8090`).

use std::path::PathBuf;

use axum::http::StatusCode;
use clap::Parser;
use serde_json::json;

use wizard::config::{load_config, WizardConfig};
use wizard::observability::logging;
use wizard::{Application, HandlerError, Json};

#[derive(Parser)]
#[command(name = "wizard")]
#[command(about = "Minimal routing web server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address, e.g. 127.0.0.1:8090
    #[arg(short, long)]
    bind: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WizardConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        body_policy = ?config.dispatch.body_policy,
        "wizard starting"
    );

    let mut app = Application::with_config(config);

    app.get("/", |_, _| Ok("Hello from wizard!"))
        .get("/health", |_, _| Ok(json!({ "status": "ok" })))
        .get("/users/{id}", |req, _| {
            let id = req
                .param("id")
                .ok_or_else(|| HandlerError::bad_request("missing user id"))?;
            Ok(Json(json!({ "id": id })))
        })
        .post("/echo", |req, res| {
            res.set_status(StatusCode::CREATED);
            Ok(req.text()?.to_owned())
        });

    app.run()?;

    tracing::info!("Shutdown complete");
    Ok(())
}
