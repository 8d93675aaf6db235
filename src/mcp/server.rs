//! Pipe (stdio) MCP server.
//!
//! This module implements the MCP session lifecycle on top of
//! [`McpHandler`]:
//!
//! 1. **Initialisation**: `initialize` request, then the
//!    `notifications/initialized` notification
//! 2. **Operation**: tools/list and tools/call
//! 3. **Shutdown**: EOF on the reader, SIGINT or SIGTERM
//!
//! Tool methods sent before initialisation completes are rejected.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId,
};
use crate::mcp::transport::StdioTransport;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// The MCP server bound to a line-oriented transport.
pub struct McpServer<R = tokio::io::Stdin, W = tokio::io::Stdout> {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: StdioTransport<R, W>,
    /// Shared request handler.
    handler: Arc<McpHandler>,
}

impl McpServer {
    /// Creates a server that talks over stdin and stdout.
    #[must_use]
    pub fn new(handler: Arc<McpHandler>) -> Self {
        Self::with_transport(handler, StdioTransport::new())
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server over an existing transport.
    pub fn with_transport(handler: Arc<McpHandler>, transport: StdioTransport<R, W>) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport,
            handler,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        tracing::info!("Apprendo MCP server running on stdio");
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let line_result = match line_result {
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::debug!(error = %e, "Received a line that is not UTF-8");
                self.transport.write_error(&JsonRpcError::parse_error()).await?;
                return Ok(false);
            }
            other => other,
        };

        let Some(line) = line_result? else {
            tracing::info!("Client closed the connection");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &str) -> std::io::Result<()> {
        match parse_message(line) {
            Ok(msg) => {
                tracing::trace!(method = msg.method(), "Received message");
                self.handle_message(msg).await
            }
            Err(error) => self.transport.write_error(&error).await,
        }
    }

    /// Handles a parsed incoming message.
    async fn handle_message(&mut self, msg: IncomingMessage) -> std::io::Result<()> {
        match msg {
            IncomingMessage::Request(req) => {
                match self.handle_request(&req) {
                    Ok(resp) => self.transport.write_response(&resp).await,
                    Err(error) => self.transport.write_error(&error).await,
                }
            }
            IncomingMessage::Notification(ref notif) => {
                self.handle_notification(notif);
                Ok(())
            }
        }
    }

    /// Applies lifecycle rules, then delegates to the shared handler.
    fn handle_request(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        match req.method.as_str() {
            "initialize" => {
                if self.state != ServerState::AwaitingInit {
                    return Err(JsonRpcError::new(
                        Some(req.id.clone()),
                        JsonRpcErrorData::with_message(
                            ErrorCode::InvalidRequest,
                            "Server already initialised",
                        ),
                    ));
                }
                let response = self.handler.handle_request(req)?;
                self.state = ServerState::Initialising;
                Ok(response)
            }
            "tools/list" | "tools/call" => {
                self.require_running(&req.id)?;
                self.handler.handle_request(req)
            }
            _ => self.handler.handle_request(req),
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Client initialised, session running");
            self.state = ServerState::Running;
        }
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            ));
        }
        Ok(())
    }
}
