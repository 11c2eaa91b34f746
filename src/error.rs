//! Error types for the download path.
//!
//! Every failure carries the offending value or the underlying OS error so
//! callers can match on the variant (or on [`ErrorKind`]) instead of parsing
//! message text.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DownloadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing caller input (URL, port, protocol).
    InvalidArgument,
    /// Resolver or connect failure.
    Connection,
    /// Send/receive failure on an established connection, including timeouts.
    Transport,
    /// The peer sent something that is not a response we can frame.
    Protocol,
    /// The user aborted the download.
    Canceled,
    /// The server answered with a status other than 200.
    HttpStatus,
    /// Local file system failure while writing the output.
    Io,
}

/// Framing violations detected while reading a response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A CR in the status line was not followed by LF.
    #[error("invalid server response")]
    MalformedStatusLine,

    /// The peer closed the connection before the status line ended.
    #[error("unable to retrieve status line")]
    StatusLineIncomplete,

    /// The peer closed the connection before the blank line ending the headers.
    #[error("unable to retrieve headers")]
    HeadersIncomplete,

    /// A header line ended with a bare LF.
    #[error("unable to parse headers")]
    MalformedHeaders,

    /// A status line, header block or chunk-size line grew past the limit.
    #[error("response head exceeds {limit} bytes")]
    HeaderTooLarge {
        /// Configured maximum in bytes.
        limit: usize,
    },

    /// The body length cannot be determined.
    #[error("neither Transfer-Encoding nor Content-Length present")]
    MissingBodyLength,

    /// `Content-Length` is not a non-negative integer.
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// `Transfer-Encoding` without `chunked`.
    #[error("unsupported Transfer-Encoding: {0}")]
    UnsupportedTransferEncoding(String),

    /// More bytes arrived with the headers than the declared length.
    #[error("unable to get content: {buffered} bytes buffered for a {expected} byte body")]
    ContentOverrun {
        /// Declared `Content-Length`.
        expected: u64,
        /// Body bytes already buffered.
        buffered: u64,
    },

    /// The peer closed the connection before the declared length arrived.
    #[error("unable to download content: {remaining} bytes missing")]
    ContentTruncated {
        /// Bytes still outstanding.
        remaining: u64,
    },

    /// The peer closed the connection in the middle of a chunk-size line.
    #[error("unable to obtain chunk length")]
    ChunkSizeIncomplete,

    /// A chunk-size line is not a hexadecimal number.
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(String),

    /// The peer closed the connection in the middle of chunk data.
    #[error("unable to download chunk: {remaining} bytes missing")]
    ChunkTruncated {
        /// Bytes of the current chunk still outstanding.
        remaining: u64,
    },
}

/// Errors that can occur while downloading a URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// No URL was given.
    #[error("URL is not specified")]
    MissingUrl,

    /// The URL does not match `[scheme://]host[:port]/path`.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
    },

    /// The port is 0 or above 65535.
    #[error("invalid port value: {port}")]
    InvalidPort {
        /// The port text as it appeared in the URL.
        port: String,
    },

    /// The URL names a scheme other than `http`, or none at all.
    #[error("unsupported protocol: {}", .protocol.as_deref().unwrap_or(""))]
    UnsupportedProtocol {
        /// The scheme, if the URL had one.
        protocol: Option<String>,
    },

    /// The resolver returned no IPv4 address for the host.
    #[error("cannot resolve host {host}")]
    Resolve {
        /// Host name that failed to resolve.
        host: String,
    },

    /// The TCP connect failed or timed out.
    #[error("unable to connect to {host} ({addr}): {source}")]
    Connect {
        /// Host name from the URL.
        host: String,
        /// Resolved address.
        addr: SocketAddr,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Sending the request or receiving the response failed.
    #[error("{stage}: {source}")]
    Transport {
        /// What the connection was doing when it failed.
        stage: &'static str,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The response could not be framed.
    #[error("invalid server response: {0}")]
    Protocol(#[from] ProtocolError),

    /// The cancellation token fired.
    #[error("canceled")]
    Canceled,

    /// The server answered with a non-200 status.
    #[error(
        "unsuccessful request, status code: {code} {text}{}",
        location_suffix(.location)
    )]
    HttpStatus {
        /// Numeric status code.
        code: u32,
        /// Reason phrase.
        text: String,
        /// `Location` header for redirect responses.
        location: Option<String>,
    },

    /// The output file could not be created.
    #[error("unable to open file '{}': {source}", .path.display())]
    Output {
        /// Output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Writing downloaded bytes failed.
    #[error("unable to write downloaded content: {source}")]
    Write {
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Every `name (N).ext` candidate is taken.
    #[error("unable to obtain unique name for file '{file_name}', try another download directory")]
    OutputPathExhausted {
        /// Requested file name.
        file_name: String,
    },
}

fn location_suffix(location: &Option<String>) -> String {
    match location {
        Some(loc) => format!(", new location: {loc}"),
        None => String::new(),
    }
}

impl DownloadError {
    /// Creates a transport error for the given stage.
    pub fn transport(stage: &'static str, source: io::Error) -> Self {
        Self::Transport { stage, source }
    }

    /// Returns the taxonomy tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingUrl
            | Self::InvalidUrl { .. }
            | Self::InvalidPort { .. }
            | Self::UnsupportedProtocol { .. } => ErrorKind::InvalidArgument,
            Self::Resolve { .. } | Self::Connect { .. } => ErrorKind::Connection,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Canceled => ErrorKind::Canceled,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Output { .. } | Self::Write { .. } | Self::OutputPathExhausted { .. } => {
                ErrorKind::Io
            }
        }
    }

    /// Returns the protocol error, if this is one.
    pub fn as_protocol(&self) -> Option<&ProtocolError> {
        match self {
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}
