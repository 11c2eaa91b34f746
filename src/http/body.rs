//! Response body decoding.
//!
//! Two framings are supported: a fixed `Content-Length` and
//! `Transfer-Encoding: chunked`. Both start from whatever body bytes arrived
//! together with the headers and produce identical output no matter how the
//! peer's bytes are split across reads.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::{DownloadError, ProtocolError};
use crate::http::connection::{Connection, RECV_CHUNK_SIZE};
use crate::http::parser::parse_chunk_size;
use crate::http::response::BodyFraming;
use crate::progress::ProgressSink;

/// Output side of a body download: every emitted slice is written out and
/// then reported to the progress sink.
pub struct BodySink<'a, W> {
    out: &'a mut W,
    progress: &'a mut dyn ProgressSink,
    written: u64,
}

impl<'a, W> BodySink<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(out: &'a mut W, progress: &'a mut dyn ProgressSink) -> Self {
        Self {
            out,
            progress,
            written: 0,
        }
    }

    pub async fn emit(&mut self, data: &[u8]) -> Result<(), DownloadError> {
        if data.is_empty() {
            return Ok(());
        }

        self.out
            .write_all(data)
            .await
            .map_err(|source| DownloadError::Write { source })?;

        let len = data.len() as u64;
        self.written += len;
        self.progress.add_progress(len);
        Ok(())
    }

    fn check_canceled(&self) -> Result<(), DownloadError> {
        if self.progress.is_canceled() {
            return Err(DownloadError::Canceled);
        }
        Ok(())
    }

    async fn finish(self) -> Result<u64, DownloadError> {
        self.out
            .flush()
            .await
            .map_err(|source| DownloadError::Write { source })?;
        Ok(self.written)
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Reads the headers and writes the body to `out`.
    ///
    /// Returns the number of body bytes written. The progress sink is started
    /// once the framing is known and always stopped before returning.
    pub async fn download<W>(
        &mut self,
        out: &mut W,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64, DownloadError>
    where
        W: AsyncWrite + Unpin,
    {
        let headers = self.read_headers().await?;
        let framing = BodyFraming::from_headers(&headers)?;

        tracing::debug!(?framing, "Downloading body");

        progress.start();
        progress.set_total(framing.total());

        let result = {
            let mut sink = BodySink::new(out, &mut *progress);
            let decoded = match framing {
                BodyFraming::Chunked => self.download_chunks(&mut sink).await,
                BodyFraming::ContentLength(len) => self.download_content(&mut sink, len).await,
            };
            match decoded {
                Ok(()) => sink.finish().await,
                Err(e) => Err(e),
            }
        };

        progress.stop();
        result
    }

    /// Copies exactly `len` body bytes to the sink.
    pub async fn download_content<W>(
        &mut self,
        sink: &mut BodySink<'_, W>,
        len: u64,
    ) -> Result<(), DownloadError>
    where
        W: AsyncWrite + Unpin,
    {
        let buffered = self.buffer.len() as u64;
        if buffered > len {
            return Err(ProtocolError::ContentOverrun {
                expected: len,
                buffered,
            }
            .into());
        }

        let head = self.buffer.take_all();
        sink.emit(&head).await?;
        let mut remaining = len - buffered;

        while remaining > 0 {
            sink.check_canceled()?;

            let want = usize::try_from(remaining).unwrap_or(usize::MAX);
            let n = self.fill(want, "unable to download content").await?;
            if n == 0 {
                return Err(ProtocolError::ContentTruncated { remaining }.into());
            }

            let data = self.buffer.take_all();
            sink.emit(&data).await?;
            remaining = remaining.saturating_sub(n as u64);
        }

        Ok(())
    }

    /// Decodes chunks until the zero-size chunk.
    ///
    /// The trailer section after the last chunk is left unread.
    pub async fn download_chunks<W>(&mut self, sink: &mut BodySink<'_, W>) -> Result<(), DownloadError>
    where
        W: AsyncWrite + Unpin,
    {
        loop {
            let size = self.read_chunk_size(sink).await?;
            tracing::trace!(size, "Chunk");

            if size == 0 {
                return Ok(());
            }

            self.download_chunk(sink, size).await?;
        }
    }

    /// Reads one chunk-size line, skipping the empty line that ends the
    /// previous chunk's data.
    async fn read_chunk_size<W>(&mut self, sink: &BodySink<'_, W>) -> Result<u64, DownloadError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut from = 0;

        loop {
            if let Some(pos) = self.buffer.find(b"\r\n", from) {
                if pos == 0 {
                    self.buffer.advance(2);
                    from = 0;
                    continue;
                }

                let line = self.buffer.split_to(pos);
                self.buffer.advance(2);
                return Ok(parse_chunk_size(&line)?);
            }

            from = self.buffer.len().saturating_sub(1);
            self.check_head_size()?;
            sink.check_canceled()?;

            let n = self.fill(RECV_CHUNK_SIZE, "unable to obtain chunk length").await?;
            if n == 0 {
                return Err(ProtocolError::ChunkSizeIncomplete.into());
            }
        }
    }

    /// Copies `size` bytes of chunk data to the sink. Bytes past the chunk
    /// stay buffered for the next chunk-size line.
    async fn download_chunk<W>(
        &mut self,
        sink: &mut BodySink<'_, W>,
        size: u64,
    ) -> Result<(), DownloadError>
    where
        W: AsyncWrite + Unpin,
    {
        let buffered = self.buffer.len() as u64;
        if buffered >= size {
            let data = self.buffer.split_to(size as usize);
            return sink.emit(&data).await;
        }

        let head = self.buffer.take_all();
        sink.emit(&head).await?;
        let mut remaining = size - buffered;

        while remaining > 0 {
            sink.check_canceled()?;

            let n = self.fill(RECV_CHUNK_SIZE, "unable to download chunk").await? as u64;
            if n == 0 {
                return Err(ProtocolError::ChunkTruncated { remaining }.into());
            }

            if n > remaining {
                let data = self.buffer.split_to(remaining as usize);
                return sink.emit(&data).await;
            }

            let data = self.buffer.take_all();
            sink.emit(&data).await?;
            remaining -= n;
        }

        Ok(())
    }
}
