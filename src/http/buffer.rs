use bytes::{Buf, Bytes, BytesMut};

/// Returns the position of the first `needle` in `haystack` at or after `from`.
pub fn find_delimiter(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }

    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| pos + from)
}

/// Bytes received from the peer that no completed status line, header block
/// or body chunk has claimed yet.
///
/// Parsing stages take bytes from the front; whatever a read brought in past
/// the end of a stage stays here for the next one.
#[derive(Debug, Default)]
pub struct ReadBuffer {
    inner: BytesMut,
}

impl ReadBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.inner.extend_from_slice(data);
    }

    pub fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        find_delimiter(&self.inner, needle, from)
    }

    /// Removes and returns the first `n` bytes.
    pub fn split_to(&mut self, n: usize) -> Bytes {
        self.inner.split_to(n).freeze()
    }

    /// Drops the first `n` bytes.
    pub fn advance(&mut self, n: usize) {
        self.inner.advance(n);
    }

    /// Removes and returns everything buffered.
    pub fn take_all(&mut self) -> Bytes {
        self.inner.split().freeze()
    }
}
