//! apprendo-mcp: MCP server for the Apprendo book catalogue
//!
//! Serves the catalogue over stdio (the default) or HTTP.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use apprendo_mcp::catalogue::Catalogue;
use apprendo_mcp::config::{self, Config};
use apprendo_mcp::http::{AppState, HttpServer};
use apprendo_mcp::mcp::{McpHandler, McpServer};
use apprendo_mcp::tools::BookTools;

/// MCP server exposing the Apprendo book catalogue.
///
/// Lets AI assistants list books and read summaries, details, tables of
/// contents and chapter summaries.
#[derive(Parser, Debug)]
#[command(name = "apprendo-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    /// Path to the books JSON document (overrides `data_path` in the config)
    #[arg(short, long, value_name = "BOOKS_FILE", global = true)]
    data: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Transport to serve on (default: stdio)
    #[command(subcommand)]
    transport: Option<Transport>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// HTTP with a health check, POST /mcp and a GET /sse event stream
    Http {
        /// Port to listen on (overrides `http.port` in the config)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs always go to stderr; stdout belongs to the stdio transport.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the HTTP listen address from CLI and config.
fn http_addr(cfg: &Config, port: Option<u16>) -> Result<SocketAddr, std::net::AddrParseError> {
    let host: IpAddr = cfg.http.host.parse()?;
    Ok(SocketAddr::new(host, port.unwrap_or(cfg.http.port)))
}

/// Entry point for the apprendo-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if let Some(default_path) = config::default_config_path() {
                eprintln!("\nDefault config location: {}", default_path.display());
                eprintln!("See config/example-config.json for the format");
            }
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting apprendo-mcp server"
    );

    let data_path = args.data.unwrap_or_else(|| cfg.data_path.clone());
    let catalogue = Arc::new(Catalogue::load(&data_path));
    let tools = Arc::new(BookTools::new(Arc::clone(&catalogue)));
    let handler = Arc::new(McpHandler::new(tools));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.transport.unwrap_or(Transport::Stdio) {
        Transport::Stdio => {
            let mut server = McpServer::new(handler);
            runtime
                .block_on(server.run())
                .map_err(|e| e.to_string())
        }
        Transport::Http { port } => {
            let addr = match http_addr(&cfg, port) {
                Ok(addr) => addr,
                Err(e) => {
                    error!(error = %e, host = %cfg.http.host, "Invalid HTTP host");
                    return ExitCode::FAILURE;
                }
            };
            let server = HttpServer::new(AppState::new(handler, catalogue), addr, cfg.http.cors);
            runtime.block_on(server.run()).map_err(|e| {
                use std::error::Error as _;
                e.source()
                    .map_or_else(|| e.to_string(), |source| format!("{e}: {source}"))
            })
        }
    };

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
