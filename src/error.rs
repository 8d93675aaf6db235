//! Error types for apprendo-mcp.
//!
//! Each layer has its own error enum. Only [`DispatchError`] is ever shown
//! to an MCP client; the others stay on the operational log stream.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while reading the book catalogue from disk.
///
/// These never leave the loader: they are logged and replaced by an
/// empty catalogue.
#[derive(Error, Debug)]
pub enum CatalogueError {
    /// The data file could not be read.
    #[error("failed to read catalogue file: {path}")]
    Read {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The data file is not a `{ "books": [...] }` document.
    #[error("failed to parse catalogue file: {path}")]
    Parse {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by a tool invocation.
///
/// The display text is sent to the caller verbatim, so it names the
/// offending tool, argument or identifier.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No tool with this name exists.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The requested tool name.
        name: String,
    },

    /// A required argument was absent or `null`.
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// An argument was present but had the wrong JSON type.
    #[error("Invalid argument {argument}: expected {expected}")]
    InvalidArgument {
        /// Name of the argument.
        argument: &'static str,
        /// Description of the accepted type.
        expected: &'static str,
    },

    /// No book with this identifier is catalogued.
    #[error("Book with ID {book_id} not found")]
    BookNotFound {
        /// The requested book identifier.
        book_id: String,
    },

    /// The book exists but has no summary for this chapter.
    #[error("Chapter {chapter} not found for book {book_id}")]
    ChapterNotFound {
        /// The stringified chapter number.
        chapter: String,
        /// The book that was searched.
        book_id: String,
    },

    /// A result payload could not be serialised.
    #[error("failed to serialise tool result")]
    Serialisation(#[from] serde_json::Error),
}

/// Errors that stop the HTTP transport.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The listener could not be bound.
    #[error("failed to bind HTTP listener on {addr}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The server loop exited with an IO error.
    #[error("HTTP server error")]
    Serve(#[source] std::io::Error),
}
