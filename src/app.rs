//! Application facade.
//!
//! # Responsibilities
//! - Registration API named after HTTP methods
//! - Own the configuration and the route table under construction
//! - Freeze the routes into a dispatcher and serve them
//!
//! # Design Decisions
//! - No process-wide singleton: callers construct as many applications as they like
//! - `serve`/`run` consume the application, so every registration happens
//!   strictly before traffic starts and the table is read-only afterwards

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{validate_config, ConfigError, WizardConfig};
use crate::dispatch::{Dispatcher, Handler, HandlerError, IntoOutput};
use crate::http::{HttpServer, Request, Response};
use crate::lifecycle::shutdown_signal;
use crate::net::{self, ListenerError};
use crate::routing::{Method, RouteKey, RouteTable};

/// Errors that stop an application from serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Failed to build runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

macro_rules! method_routes {
    ($($(#[$doc:meta])* $name:ident => $method:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<F, R>(&mut self, path: &str, handler: F) -> &mut Self
            where
                F: Fn(&Request, &mut Response) -> Result<R, HandlerError> + Send + Sync + 'static,
                R: IntoOutput,
            {
                self.route($method, path, handler)
            }
        )*
    };
}

/// A web application: configuration plus the routes registered on it.
#[derive(Debug, Default)]
pub struct Application {
    config: WizardConfig,
    routes: RouteTable,
}

impl Application {
    /// An application with default configuration (listens on `0.0.0.0:8090`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WizardConfig) -> Self {
        Self {
            config,
            routes: RouteTable::new(),
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Register `handler` for `(method, path)`, replacing any earlier handler for that key.
    pub fn route(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
        self.routes.register(method, path, handler);
        self
    }

    /// Register one handler instance under an additional key.
    pub fn route_shared(
        &mut self,
        method: Method,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> &mut Self {
        self.routes.register_shared(method, path, handler);
        self
    }

    method_routes! {
        /// Register a GET handler.
        get => Method::Get;
        /// Register a POST handler.
        post => Method::Post;
        /// Register a PUT handler.
        put => Method::Put;
        /// Register a PATCH handler.
        patch => Method::Patch;
        /// Register a DELETE handler.
        delete => Method::Delete;
        /// Register an OPTIONS handler.
        options => Method::Options;
    }

    /// Registered route keys, sorted.
    pub fn routes(&self) -> Vec<RouteKey> {
        self.routes.keys()
    }

    /// Freeze the routes into a dispatcher configured from this application.
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.routes).with_body_policy(self.config.dispatch.body_policy)
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(
        self,
        listener: tokio::net::TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let config = self.config.clone();
        let dispatcher = Arc::new(self.into_dispatcher());

        tracing::info!(routes = dispatcher.routes().len(), "Route table frozen");
        for key in dispatcher.routes().keys() {
            tracing::debug!(route = %key, "Route");
        }

        HttpServer::new(dispatcher, &config)
            .run(listener, shutdown)
            .await?;
        Ok(())
    }

    /// Bind the configured address and serve until SIGINT/SIGTERM.
    ///
    /// Builds its own multi-threaded runtime and blocks the calling thread.
    pub fn run(self) -> Result<(), ServerError> {
        validate_config(&self.config).map_err(ConfigError::Validation)?;

        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder
            .enable_all()
            .thread_name("wizard-worker")
            .max_blocking_threads(self.config.runtime.max_blocking_threads);
        if let Some(workers) = self.config.runtime.worker_threads {
            builder.worker_threads(workers);
        }
        let runtime = builder.build().map_err(ServerError::Runtime)?;

        runtime.block_on(async move {
            let listener = net::bind(&self.config.listener).await?;
            self.serve(listener, shutdown_signal()).await
        })
    }
}
