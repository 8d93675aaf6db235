//! Newline-delimited JSON-RPC transport for the pipe adapter.
//!
//! - Messages are UTF-8 encoded JSON-RPC
//! - Messages are delimited by newlines
//! - Messages must not contain embedded newlines
//! - The reader receives messages from the client
//! - The writer sends messages to the client
//! - stderr is reserved for logging and never carries MCP messages
//!
//! In production the pair is stdin/stdout; tests plug in any
//! `AsyncRead`/`AsyncWrite` pair such as [`tokio::io::duplex`].

use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse};

/// A line-oriented MCP transport over a reader/writer pair.
pub struct StdioTransport<R = tokio::io::Stdin, W = tokio::io::Stdout> {
    /// Buffered reader for incoming messages.
    reader: BufReader<R>,
    /// Sink for outgoing messages.
    writer: W,
}

impl StdioTransport {
    /// Creates a transport over the process's stdin and stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport over an arbitrary reader/writer pair.
    pub fn with_io(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next message line.
    ///
    /// Returns `None` if the reader is closed (EOF).
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails. A line that is not valid UTF-8 is
    /// consumed and reported as [`io::ErrorKind::InvalidData`]; the next
    /// call reads the following line.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut buf).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Writes a JSON-RPC response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        self.write_message(response).await
    }

    /// Writes a JSON-RPC error.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_error(&mut self, error: &JsonRpcError) -> io::Result<()> {
        self.write_message(error).await
    }

    async fn write_message<T: Serialize + Sync>(&mut self, message: &T) -> io::Result<()> {
        let json = serde_json::to_string(message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.write_raw(&json).await
    }

    /// Writes a raw JSON string with newline termination.
    async fn write_raw(&mut self, json: &str) -> io::Result<()> {
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::RequestId;

    #[tokio::test]
    async fn read_strips_line_endings() {
        let input: &[u8] = b"{\"a\":1}\r\n{\"b\":2}\n";
        let mut transport = StdioTransport::with_io(input, Vec::new());

        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some("{\"b\":2}")
        );
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_reassembles_fragmented_lines() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"jsonrpc\":")
            .read(b"\"2.0\"}\n{\"id\"")
            .read(b":1}\n")
            .build();
        let mut transport = StdioTransport::with_io(reader, Vec::new());

        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some("{\"jsonrpc\":\"2.0\"}")
        );
        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some("{\"id\":1}")
        );
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let input: &[u8] = b"\xff\xfe\n{\"ok\":true}\n";
        let mut transport = StdioTransport::with_io(input, Vec::new());

        let err = transport.read_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(
            transport.read_line().await.unwrap().as_deref(),
            Some("{\"ok\":true}")
        );
    }

    #[tokio::test]
    async fn write_is_one_frame_then_flush() {
        let response = JsonRpcResponse::success(RequestId::Number(3), serde_json::json!({}));
        let json = serde_json::to_string(&response).unwrap();
        let writer = tokio_test::io::Builder::new()
            .write(json.as_bytes())
            .write(b"\n")
            .build();

        let mut transport = StdioTransport::with_io(tokio::io::empty(), writer);
        transport.write_response(&response).await.unwrap();
    }

    #[tokio::test]
    async fn list_books_text_is_escaped_on_the_wire() {
        // list_books joins records with '\n'; the frame itself must stay on one line.
        let response = JsonRpcResponse::success(
            RequestId::Number(1),
            serde_json::json!({ "content": [ { "type": "text", "text": "{}\n{}" } ] }),
        );

        let (client, server) = tokio::io::duplex(1024);
        let mut transport = StdioTransport::with_io(tokio::io::empty(), server);
        transport.write_response(&response).await.unwrap();
        drop(transport);

        let mut reader = BufReader::new(client);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert!(line.ends_with('\n'));
        assert!(!line.trim_end().contains('\n'));
        assert!(line.contains(r"{}\n{}"));
    }

    #[tokio::test]
    async fn errors_are_newline_terminated() {
        let error = JsonRpcError::method_not_found(RequestId::Number(1), "test/method");
        let mut transport = StdioTransport::with_io(tokio::io::empty(), Vec::new());
        transport.write_error(&error).await.unwrap();

        let written = String::from_utf8(transport.writer).unwrap();
        assert_eq!(written.matches('\n').count(), 1);
        assert!(written.contains("-32601"));
    }
}
