//! Pure parsing of the pieces of a response head.
//!
//! Nothing here does I/O; the connection feeds these functions whatever it
//! has buffered so far.

use crate::error::ProtocolError;
use crate::http::response::{HeaderMap, StatusLine};

/// Finds the CRLF ending the status line, scanning from `from`.
///
/// Returns `Ok(None)` when more bytes are needed. A trailing lone CR is left
/// for the next scan, so callers should resume at `buf.len() - 1`.
pub fn find_status_line_end(buf: &[u8], from: usize) -> Result<Option<usize>, ProtocolError> {
    for i in from..buf.len() {
        if buf[i] != b'\r' {
            continue;
        }

        return match buf.get(i + 1) {
            Some(b'\n') => Ok(Some(i)),
            Some(_) => Err(ProtocolError::MalformedStatusLine),
            None => Ok(None),
        };
    }

    Ok(None)
}

/// Splits a status line (without CRLF) into version, code and text.
///
/// The code is read leniently: leading digits are used and anything
/// non-numeric yields 0.
pub fn parse_status_line(line: &[u8]) -> StatusLine {
    let line = String::from_utf8_lossy(line);
    let rest = line.trim_start();

    let (protocol_version, rest) = split_token(rest);
    let (code, rest) = split_token(rest.trim_start());

    let digits: String = code.chars().take_while(char::is_ascii_digit).collect();
    let status_code = digits.parse().unwrap_or(0);

    StatusLine {
        protocol_version: protocol_version.to_string(),
        status_code,
        status_text: rest.trim_start().to_string(),
    }
}

fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(pos) => s.split_at(pos),
        None => (s, ""),
    }
}

/// Parses a raw header block, including its terminating blank line.
///
/// Runs of spaces and tabs inside a name or value collapse to a single
/// space and are trimmed at the edges. Names are lowercased. Only the first
/// colon on a line separates name from value.
pub fn parse_headers(block: &[u8]) -> Result<HeaderMap, ProtocolError> {
    let mut headers = HeaderMap::new();

    let mut in_key = true;
    let mut saw_cr = false;
    let mut pending_space = false;
    let mut inside_token = false;
    let mut key: Vec<u8> = Vec::new();
    let mut value: Vec<u8> = Vec::new();

    for &ch in block {
        match ch {
            b':' if in_key => {
                in_key = false;
                inside_token = false;
                pending_space = false;
            }
            b'\r' => saw_cr = true,
            b'\n' => {
                if !saw_cr {
                    return Err(ProtocolError::MalformedHeaders);
                }

                if !key.is_empty() {
                    headers.insert(
                        String::from_utf8_lossy(&key),
                        String::from_utf8_lossy(&value).into_owned(),
                    );
                }

                key.clear();
                value.clear();
                saw_cr = false;
                in_key = true;
                inside_token = false;
                pending_space = false;
            }
            b' ' | b'\t' => {
                if inside_token {
                    pending_space = true;
                }
            }
            _ => {
                inside_token = true;
                let field = if in_key { &mut key } else { &mut value };
                if pending_space {
                    field.push(b' ');
                    pending_space = false;
                }
                field.push(ch);
            }
        }
    }

    Ok(headers)
}

/// Parses a chunk-size line (without CRLF). Chunk extensions are ignored.
pub fn parse_chunk_size(line: &[u8]) -> Result<u64, ProtocolError> {
    let text = String::from_utf8_lossy(line);
    let size = text.split(';').next().unwrap_or("").trim();

    u64::from_str_radix(size, 16).map_err(|_| ProtocolError::InvalidChunkSize(text.into_owned()))
}
