//! rawget - HTTP/1.1 downloader over a raw TCP socket
//!
//! Core library for URL parsing, the connection engine and body decoding.

pub mod cancel;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod output;
pub mod progress;

pub use cancel::CancellationToken;
pub use config::Config;
pub use downloader::Downloader;
pub use error::{DownloadError, ErrorKind, ProtocolError};
pub use output::OutputOptions;
pub use progress::{ConsoleProgress, NoProgress, ProgressSink};
