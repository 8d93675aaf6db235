//! HTTP server that binds the axum router to a TCP socket.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use super::router::{build_router, AppState};
use crate::error::HttpError;

/// Axum-based HTTP server for the MCP transport.
pub struct HttpServer {
    addr: SocketAddr,
    state: AppState,
    cors: bool,
}

impl HttpServer {
    /// Creates a new HTTP server.
    #[must_use]
    pub const fn new(state: AppState, addr: SocketAddr, cors: bool) -> Self {
        Self { addr, state, cors }
    }

    /// The address the server will bind.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts the server and runs until SIGINT/SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server loop fails.
    pub async fn run(self) -> Result<(), HttpError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| HttpError::Bind {
                addr: self.addr.to_string(),
                source: e,
            })?;

        let port = self.addr.port();
        tracing::info!(addr = %self.addr, "Apprendo HTTP MCP server running on port {port}");
        tracing::info!("Health check: http://localhost:{port}/");
        tracing::info!("MCP endpoint: http://localhost:{port}/mcp");
        tracing::info!("Event stream: http://localhost:{port}/sse");

        let shutdown = self.state.shutdown.clone();
        let mut router = build_router(self.state);
        if self.cors {
            router = router.layer(CorsLayer::permissive());
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                shutdown.cancel();
            })
            .await
            .map_err(HttpError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
