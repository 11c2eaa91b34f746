use std::sync::LazyLock;

use regex::Regex;

use crate::error::DownloadError;

/// Port used when the URL does not name one.
pub const DEFAULT_PORT: u16 = 80;

/// `[scheme://]host[:port]/path[?query]`
///
/// Groups: 1 scheme, 2 host, 3 port, 4 path without the leading slash,
/// 5 final path segment.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:([A-Za-z]+)://)?",
        r"([A-Za-z0-9.\-_]+)(?::([0-9]{1,5}))?",
        r"/((?:[A-Za-z0-9.\-_%]*/)*([A-Za-z0-9.\-_%]+)(?:\?[A-Za-z0-9.\-_=&,#%]*)?)$",
    ))
    .expect("URL regex is valid") // Static pattern, safe to panic
});

/// Everything needed to issue the GET request for one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Scheme as written in the URL; `None` when the URL has no `scheme://`
    pub protocol: Option<String>,
    /// Host name or address literal
    pub host: String,
    /// TCP port, 80 unless the URL says otherwise
    pub port: u16,
    /// Request target without the leading `/`, query included
    pub path: String,
    /// Last path segment, used as the default output file name
    pub file_name: String,
}

impl RequestInfo {
    /// Parses a download URL.
    ///
    /// Any scheme is accepted here; callers decide which ones they support.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawget::http::request::RequestInfo;
    /// let info = RequestInfo::parse("http://example.com:8080/files/report.pdf?v=2").unwrap();
    /// assert_eq!(info.protocol.as_deref(), Some("http"));
    /// assert_eq!(info.host, "example.com");
    /// assert_eq!(info.port, 8080);
    /// assert_eq!(info.path, "files/report.pdf?v=2");
    /// assert_eq!(info.file_name, "report.pdf");
    /// ```
    pub fn parse(url: &str) -> Result<Self, DownloadError> {
        if url.is_empty() {
            return Err(DownloadError::MissingUrl);
        }

        let caps = URL_PATTERN
            .captures(url)
            .ok_or_else(|| DownloadError::InvalidUrl {
                url: url.to_string(),
            })?;

        let port = match caps.get(3) {
            Some(m) => parse_port(m.as_str())?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            protocol: caps.get(1).map(|m| m.as_str().to_string()),
            host: caps[2].to_string(),
            port,
            path: caps[4].to_string(),
            file_name: caps[5].to_string(),
        })
    }

    /// Serializes the GET request sent for this download.
    pub fn get_request(&self, user_agent: &str) -> Vec<u8> {
        format!(
            "GET /{} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nAccept: */*\r\nConnection: keep-alive\r\n\r\n",
            self.path, self.host, user_agent
        )
        .into_bytes()
    }
}

fn parse_port(text: &str) -> Result<u16, DownloadError> {
    match text.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(DownloadError::InvalidPort {
            port: text.to_string(),
        }),
    }
}
