//! apprendo-mcp: MCP server for the Apprendo book catalogue
//!
//! A fixed catalogue of books is loaded from a JSON document at startup and
//! exposed to AI assistants as five read-only tools: `list_books`,
//! `get_book_summary`, `get_book_details`, `get_table_of_contents` and
//! `get_chapter_summary`.
//!
//! # Architecture
//!
//! - **Catalogue**: immutable, loaded once, shared as `Arc<Catalogue>`
//! - **Tools**: the [`tools::Dispatch`] capability, implemented by
//!   [`tools::BookTools`]
//! - **MCP**: JSON-RPC 2.0 routing shared by both transports
//! - **Transports**: stdio ([`mcp::McpServer`]) and HTTP ([`http::HttpServer`])
//!
//! # Modules
//!
//! - [`catalogue`] — Book records and the startup loader
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`http`] — HTTP and event-stream transport
//! - [`mcp`] — MCP protocol implementation and stdio transport
//! - [`tools`] — Tool definitions and dispatch

pub mod catalogue;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod tools;
