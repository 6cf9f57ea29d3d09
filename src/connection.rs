//! Tokio TCP transport with timeout-bounded reads and line buffering.
//!
//! A single read may carry a partial trailing line or several merged
//! lines; the incomplete tail is kept in the buffer and prepended to the
//! next read, so a logical line split across reads still comes out as
//! exactly one line. Decoding also happens per complete line, which keeps
//! a multi-byte UTF-8 character split across reads intact.

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace, warn};

use crate::error::{BotError, Result};

/// Size of one socket read. Message boundaries do not align with it.
pub const READ_BUFFER_SIZE: usize = 2048;

/// Wire line terminator.
pub const LINE_TERMINATOR: &str = "\r\n";

/// A connected transport. Generic over the stream so tests can drive it
/// with an in-memory duplex pipe.
#[derive(Debug)]
pub struct Connection<S = TcpStream> {
    stream: S,
    pending: BytesMut,
}

impl Connection<TcpStream> {
    /// Open a TCP connection. Failure here is fatal to startup.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        Ok(Self::from_stream(stream))
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));
    sock.set_tcp_keepalive(&keepalive)
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wrap an already-connected stream.
    pub fn from_stream(stream: S) -> Self {
        Self {
            stream,
            pending: BytesMut::with_capacity(READ_BUFFER_SIZE),
        }
    }

    /// Wait for data, bounded by `timeout` (indefinite when `None`), and
    /// return the complete lines that arrived. A timeout is not an
    /// error: it yields an empty batch. Empty fragments are discarded.
    pub async fn receive(&mut self, timeout: Option<Duration>) -> Result<Vec<String>> {
        let mut chunk = [0u8; READ_BUFFER_SIZE];
        let read = match timeout {
            Some(bound) => match tokio::time::timeout(bound, self.stream.read(&mut chunk)).await {
                Ok(result) => result?,
                Err(_elapsed) => return Ok(Vec::new()),
            },
            None => self.stream.read(&mut chunk).await?,
        };
        if read == 0 {
            return Err(BotError::ConnectionClosed);
        }
        self.pending.extend_from_slice(&chunk[..read]);
        Ok(self.drain_lines())
    }

    /// Split complete lines off the buffer, leaving any unterminated
    /// tail for the next read. A line that fails UTF-8 decoding is
    /// logged and skipped; the rest of the batch is kept.
    fn drain_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line = self.pending.split_to(pos + 1);
            line.truncate(line.len() - 1);
            if line.last() == Some(&b'\r') {
                let without_cr = line.len() - 1;
                line.truncate(without_cr);
            }
            let text = match String::from_utf8(line.to_vec()) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "discarding non-UTF-8 line");
                    continue;
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            trace!(line = %text, "recv");
            lines.push(text);
        }
        lines
    }

    /// Write one command, appending the line terminator if absent.
    /// `write_all` covers partial writes.
    pub async fn send(&mut self, command: &str) -> Result<()> {
        let mut wire = command.to_string();
        if !wire.ends_with('\n') {
            wire.push_str(LINE_TERMINATOR);
        }
        self.stream.write_all(wire.as_bytes()).await?;
        self.stream.flush().await?;
        debug!(octets = wire.len(), "sent line");
        Ok(())
    }

    /// Shut down the write half, signalling a clean disconnect.
    pub async fn shutdown(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}
