use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::{DownloadError, ProtocolError};
use crate::http::buffer::ReadBuffer;
use crate::http::parser::{find_status_line_end, parse_headers, parse_status_line};
use crate::http::response::{HeaderMap, StatusLine};

/// Largest single receive.
pub(crate) const RECV_CHUNK_SIZE: usize = 4096;
/// Receive size while looking for the status line.
const STATUS_LINE_READ: usize = 64;
/// Receive size while looking for the end of the headers.
const HEADER_READ: usize = 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// One HTTP/1.1 exchange over a single stream.
///
/// Owns the stream and the read-ahead buffer for its whole life; dropping the
/// connection closes the socket.
pub struct Connection<S> {
    stream: S,
    pub(crate) buffer: ReadBuffer,
    cancel: CancellationToken,
    receive_timeout: Duration,
    max_header_bytes: usize,
}

impl Connection<TcpStream> {
    /// Resolves `host` to its first IPv4 address and connects.
    pub async fn connect(
        host: &str,
        port: u16,
        cfg: &Config,
        cancel: CancellationToken,
    ) -> Result<Self, DownloadError> {
        let addr = resolve(host, port).await?;

        tracing::debug!(host, %addr, "Connecting");

        let stream = match timeout(cfg.connect_timeout(), TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(DownloadError::Connect {
                    host: host.to_string(),
                    addr,
                    source,
                });
            }
            Err(_) => {
                return Err(DownloadError::Connect {
                    host: host.to_string(),
                    addr,
                    source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
                });
            }
        };

        tracing::trace!(host, %addr, "Connected");

        Ok(Self::new(stream, cfg, cancel))
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, DownloadError> {
    let unresolved = || DownloadError::Resolve {
        host: host.to_string(),
    };

    tokio::net::lookup_host((host, port))
        .await
        .map_err(|_| unresolved())?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(unresolved)
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, cfg: &Config, cancel: CancellationToken) -> Self {
        Self {
            stream,
            buffer: ReadBuffer::with_capacity(RECV_CHUNK_SIZE),
            cancel,
            receive_timeout: cfg.receive_timeout(),
            max_header_bytes: cfg.max_header_bytes,
        }
    }

    /// Returns a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Bytes received but not yet claimed by any parsing stage.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Writes the whole request.
    pub async fn send_request(&mut self, request: &[u8]) -> Result<(), DownloadError> {
        let stage = "unable to send request";

        self.stream
            .write_all(request)
            .await
            .map_err(|e| DownloadError::transport(stage, e))?;
        self.stream
            .flush()
            .await
            .map_err(|e| DownloadError::transport(stage, e))?;

        tracing::trace!(bytes = request.len(), "Request sent");
        Ok(())
    }

    /// Reads and parses the status line.
    ///
    /// Anything received after the CRLF stays buffered for the headers.
    pub async fn read_status_line(&mut self) -> Result<StatusLine, DownloadError> {
        let mut from = 0;

        loop {
            if let Some(end) = find_status_line_end(self.buffer.as_bytes(), from)? {
                let line = self.buffer.split_to(end);
                self.buffer.advance(2);

                let status = parse_status_line(&line);
                tracing::debug!(
                    version = %status.protocol_version,
                    code = status.status_code,
                    text = %status.status_text,
                    "Status line received"
                );
                return Ok(status);
            }

            from = self.buffer.len().saturating_sub(1);
            self.check_head_size()?;

            let n = self.fill(STATUS_LINE_READ, "unable to check status code").await?;
            if n == 0 {
                return Err(ProtocolError::StatusLineIncomplete.into());
            }
        }
    }

    /// Reads the header block up to and including the blank line.
    ///
    /// Bytes after the blank line stay buffered as the start of the body.
    pub async fn read_headers(&mut self) -> Result<HeaderMap, DownloadError> {
        let mut from = 0;

        loop {
            // Status line followed directly by the blank line
            if self.buffer.as_bytes().starts_with(b"\r\n") {
                self.buffer.advance(2);
                tracing::debug!(count = 0, "Headers received");
                return Ok(HeaderMap::new());
            }

            if let Some(pos) = self.buffer.find(HEADER_TERMINATOR, from) {
                let block = self.buffer.split_to(pos + HEADER_TERMINATOR.len());
                let headers = parse_headers(&block)?;

                tracing::debug!(
                    count = headers.len(),
                    body_prefix = self.buffer.len(),
                    "Headers received"
                );
                return Ok(headers);
            }

            // A terminator may straddle two reads
            from = self.buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
            self.check_head_size()?;

            let n = self.fill(HEADER_READ, "unable to retrieve http headers").await?;
            if n == 0 {
                return Err(ProtocolError::HeadersIncomplete.into());
            }
        }
    }

    pub(crate) fn check_head_size(&self) -> Result<(), ProtocolError> {
        if self.buffer.len() > self.max_header_bytes {
            return Err(ProtocolError::HeaderTooLarge {
                limit: self.max_header_bytes,
            });
        }
        Ok(())
    }

    /// Receives at most `max` bytes into the read buffer.
    ///
    /// Checks the cancellation token first. Returns 0 when the peer closed
    /// the connection.
    pub(crate) async fn fill(
        &mut self,
        max: usize,
        stage: &'static str,
    ) -> Result<usize, DownloadError> {
        let mut chunk = [0u8; RECV_CHUNK_SIZE];
        let limit = max.min(chunk.len());

        loop {
            if self.cancel.is_canceled() {
                return Err(DownloadError::Canceled);
            }

            let n = match timeout(self.receive_timeout, self.stream.read(&mut chunk[..limit])).await
            {
                Ok(Ok(n)) => n,
                Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Ok(Err(e)) => return Err(DownloadError::transport(stage, e)),
                Err(_) => {
                    return Err(DownloadError::transport(
                        stage,
                        io::Error::new(io::ErrorKind::TimedOut, "receive timed out"),
                    ));
                }
            };

            self.buffer.extend(&chunk[..n]);
            tracing::trace!(received = n, buffered = self.buffer.len(), "Received");
            return Ok(n);
        }
    }
}

impl<S> Drop for Connection<S> {
    fn drop(&mut self) {
        tracing::trace!(unclaimed = self.buffer.len(), "Connection closed");
    }
}
