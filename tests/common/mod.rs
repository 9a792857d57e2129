//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use wizard::{Application, ServerError, Shutdown};

/// An application serving on an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.handle.await.expect("server task panicked")
    }
}

/// Bind `127.0.0.1:0` and serve `app` in the background.
pub async fn spawn(app: Application) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signalled = shutdown.signalled();

    let handle = tokio::spawn(async move { app.serve(listener, signalled).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// A client that never reuses connections, so shutdown is not held open by idle keep-alives.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
