//! Shared helpers for connection tests.
//!
//! `ScriptedStream` replays a fixed sequence of reads, one script entry per
//! `read` call, so tests control exactly where the peer's bytes are split.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use rawget::http::connection::Connection;
use rawget::{CancellationToken, Config, ProgressSink};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pub struct ScriptedStream {
    reads: VecDeque<Vec<u8>>,
    reads_issued: Arc<AtomicUsize>,
    cancel_on_read: Option<CancellationToken>,
    pub written: Vec<u8>,
}

impl ScriptedStream {
    pub fn new<I, B>(reads: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self {
            reads: reads.into_iter().map(|b| b.as_ref().to_vec()).collect(),
            reads_issued: Arc::new(AtomicUsize::new(0)),
            cancel_on_read: None,
            written: Vec::new(),
        }
    }

    /// Splits `data` into reads of at most `size` bytes.
    pub fn chopped(data: &[u8], size: usize) -> Self {
        Self::new(data.chunks(size))
    }

    /// Splits `data` at the given offsets.
    pub fn split_at(data: &[u8], offsets: &[usize]) -> Self {
        let mut reads = Vec::new();
        let mut start = 0;
        for &end in offsets {
            reads.push(data[start..end].to_vec());
            start = end;
        }
        reads.push(data[start..].to_vec());
        Self::new(reads.into_iter().filter(|r| !r.is_empty()))
    }

    /// Cancels `token` as a side effect of the first read.
    pub fn cancel_on_read(mut self, token: CancellationToken) -> Self {
        self.cancel_on_read = Some(token);
        self
    }

    /// Counter of `read` calls, readable after the stream moved into a connection.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads_issued)
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.reads_issued.fetch_add(1, Ordering::SeqCst);

        if let Some(token) = &self.cancel_on_read {
            token.cancel();
        }

        if let Some(mut next) = self.reads.pop_front() {
            let n = next.len().min(buf.remaining());
            buf.put_slice(&next[..n]);
            if n < next.len() {
                let rest = next.split_off(n);
                self.reads.push_front(rest);
            }
        }

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Progress sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub events: Vec<String>,
    pub total: Option<u64>,
    pub progress: Vec<u64>,
    pub canceled: bool,
}

impl RecordingProgress {
    pub fn reported(&self) -> u64 {
        self.progress.iter().sum()
    }
}

impl ProgressSink for RecordingProgress {
    fn start(&mut self) {
        self.events.push("start".to_string());
    }

    fn stop(&mut self) {
        self.events.push("stop".to_string());
    }

    fn set_total(&mut self, bytes: u64) {
        self.events.push(format!("total {bytes}"));
        self.total = Some(bytes);
    }

    fn add_progress(&mut self, bytes: u64) {
        self.progress.push(bytes);
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }
}

pub fn connection(stream: ScriptedStream) -> Connection<ScriptedStream> {
    Connection::new(stream, &Config::default(), CancellationToken::new())
}
