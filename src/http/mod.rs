//! HTTP transport: health check, JSON-RPC over POST, and an event stream.

pub mod router;
pub mod server;
pub mod sse;

pub use router::{build_router, AppState, SERVICE_NAME};
pub use server::HttpServer;
pub use sse::{KeepAliveHandle, StreamRegistry, KEEP_ALIVE_INTERVAL};
