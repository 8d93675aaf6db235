//! Model Context Protocol (MCP) implementation.
//!
//! Both transports share one [`McpHandler`], which routes JSON-RPC 2.0
//! methods to the tool dispatcher.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐      ┌──────────────┐      ┌─────────────┐
//! │ StdioTransport    │─────▶│              │      │             │
//! │ (McpServer)       │      │  McpHandler  │─────▶│  BookTools  │
//! ├───────────────────┤      │              │      │ (Dispatch)  │
//! │ HTTP POST /mcp    │─────▶│              │      │             │
//! └───────────────────┘      └──────────────┘      └─────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation speaks MCP 2025-03-26 and 2024-11-05.

pub mod handler;
pub mod protocol;
pub mod server;
pub mod transport;

pub use handler::McpHandler;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::StdioTransport;
