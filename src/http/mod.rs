//! HTTP/1.1 client protocol implementation.
//!
//! This module performs a single GET request over a raw stream and decodes
//! the response without any HTTP library.
//!
//! # Architecture
//!
//! - **`request`**: URL parsing and serialization of the GET request
//! - **`connection`**: The connection engine owning the socket and read buffer
//! - **`parser`**: Pure parsing of status lines, header blocks and chunk sizes
//! - **`response`**: Status line, header map and body framing types
//! - **`buffer`**: The read-ahead buffer and delimiter search
//! - **`body`**: Content-Length and chunked body decoding
//!
//! # Response Flow
//!
//! Every stage consumes bytes from the front of the read buffer and leaves
//! any over-read bytes for the next stage:
//!
//! ```text
//!        ┌──────────────────┐
//!        │   Status line    │ ← scan for CRLF
//!        └──────┬───────────┘
//!               │ 200, or a redirect
//!               ▼
//!        ┌──────────────────┐
//!        │     Headers      │ ← scan for CRLF CRLF
//!        └──────┬───────────┘
//!               │ 200 only
//!               ├─ Transfer-Encoding: chunked → chunk-size line, data, repeat until 0
//!               └─ Content-Length: N          → exactly N bytes
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rawget::http::connection::Connection;
//! use rawget::http::request::RequestInfo;
//! use rawget::{CancellationToken, Config, NoProgress};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Config::default();
//!     let info = RequestInfo::parse("http://example.com/index.html")?;
//!
//!     let mut conn = Connection::connect(&info.host, info.port, &cfg, CancellationToken::new()).await?;
//!     conn.send_request(&info.get_request(&cfg.user_agent)).await?;
//!
//!     let status = conn.read_status_line().await?;
//!     if status.is_success() {
//!         let mut body = Vec::new();
//!         conn.download(&mut body, &mut NoProgress).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod body;
pub mod buffer;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
