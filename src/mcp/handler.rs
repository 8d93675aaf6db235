//! Transport-independent MCP request handling.
//!
//! [`McpHandler`] turns a parsed JSON-RPC request into a response. It holds
//! no session state, so the stdio server and every HTTP request share one
//! instance. Session lifecycle (initialise-before-use) is the stdio
//! server's concern.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mcp::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION, SERVER_NAME,
    SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::tools::Dispatch;

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities.
///
/// The tool set is fixed, so `listChanged` is always false.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    pub list_changed: bool,
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Routes MCP methods to the shared tool dispatcher.
#[derive(Clone)]
pub struct McpHandler {
    tools: Arc<dyn Dispatch>,
}

impl std::fmt::Debug for McpHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpHandler").finish_non_exhaustive()
    }
}

impl McpHandler {
    /// Creates a handler over the given dispatcher.
    #[must_use]
    pub fn new(tools: Arc<dyn Dispatch>) -> Self {
        Self { tools }
    }

    /// Handles any request method.
    ///
    /// # Errors
    ///
    /// Returns a JSON-RPC error for unknown methods, bad parameters, or a
    /// failed tool call.
    pub fn handle_request(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        match req.method.as_str() {
            "initialize" => Self::handle_initialize(req),
            "tools/list" => Ok(self.handle_tools_list(req)),
            "tools/call" => self.handle_tools_call(req),
            "ping" => Ok(Self::handle_ping(req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Handles the initialize request.
    ///
    /// Echoes the client's protocol version when supported, otherwise
    /// offers the newest one.
    ///
    /// # Errors
    ///
    /// Returns an invalid params error if the parameters are missing or
    /// malformed.
    pub fn handle_initialize(req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: InitializeParams = parse_params(req, "initialize")?;

        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                requested_version = %params.protocol_version,
                "Client initialising"
            );
        }

        let requested = params.protocol_version.as_str();
        let negotiated_version = if SUPPORTED_PROTOCOL_VERSIONS.contains(&requested) {
            params.protocol_version
        } else {
            MCP_PROTOCOL_VERSION.to_string()
        };

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    #[must_use]
    pub fn handle_tools_list(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let result = json!({
            "tools": self.tools.definitions(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the tools/call request.
    ///
    /// # Errors
    ///
    /// Returns a JSON-RPC error carrying the dispatch failure message.
    pub fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: ToolCallParams = parse_params(req, "tool call")?;

        let result = self
            .tools
            .dispatch(&params.name, &params.arguments)
            .map_err(|e| {
                tracing::debug!(tool = %params.name, error = %e, "Tool call failed");
                JsonRpcError::from_dispatch(req.id.clone(), &e)
            })?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Handles the ping request.
    #[must_use]
    pub fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }
}

/// Deserialises required request parameters.
fn parse_params<T: serde::de::DeserializeOwned>(
    req: &JsonRpcRequest,
    what: &str,
) -> Result<T, JsonRpcError> {
    req.params
        .as_ref()
        .map(|p| serde_json::from_value(p.clone()))
        .transpose()
        .map_err(|e| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {what} params: {e}"))
        })?
        .ok_or_else(|| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Missing {what} params"))
        })
}
