use std::collections::HashMap;

use crate::error::ProtocolError;

/// Status codes after which the server is expected to send a `Location` header.
const REDIRECT_CODES: [u32; 6] = [301, 302, 303, 305, 307, 308];

/// First line of an HTTP response.
///
/// # Example
///
/// ```
/// # use rawget::http::parser::parse_status_line;
/// let status = parse_status_line(b"HTTP/1.1 404 Not Found");
/// assert_eq!(status.status_code, 404);
/// assert_eq!(status.status_text, "Not Found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Protocol version, e.g. `HTTP/1.1`
    pub protocol_version: String,
    /// Numeric status code, 0 when the server sent something non-numeric
    pub status_code: u32,
    /// Reason phrase, may contain spaces
    pub status_text: String,
}

impl StatusLine {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn is_redirect(&self) -> bool {
        REDIRECT_CODES.contains(&self.status_code)
    }
}

/// Response headers keyed by lowercased name.
///
/// Repeated headers keep every value, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, Vec<String>>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value. The name is lowercased.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .entry(name.as_ref().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Returns the first value received for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Returns every value received for `name` (case-insensitive).
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Total number of values, counting repeats.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

/// How the end of the response body is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// `Transfer-Encoding: chunked`
    Chunked,
    /// Exactly this many bytes follow the headers.
    ContentLength(u64),
}

impl BodyFraming {
    /// Picks the framing from the response headers.
    ///
    /// `Transfer-Encoding` wins over `Content-Length`; a transfer coding
    /// without `chunked` is rejected.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ProtocolError> {
        if let Some(encoding) = headers.get("transfer-encoding") {
            let encoding = encoding.to_ascii_lowercase();
            if encoding.contains("chunked") {
                return Ok(Self::Chunked);
            }
            return Err(ProtocolError::UnsupportedTransferEncoding(encoding));
        }

        let length = headers
            .get("content-length")
            .ok_or(ProtocolError::MissingBodyLength)?;

        length
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|n| u64::try_from(n).ok())
            .map(Self::ContentLength)
            .ok_or_else(|| ProtocolError::InvalidContentLength(length.to_string()))
    }

    /// Total size reported to the progress sink; 0 means unknown.
    pub fn total(&self) -> u64 {
        match self {
            Self::Chunked => 0,
            Self::ContentLength(n) => *n,
        }
    }
}
