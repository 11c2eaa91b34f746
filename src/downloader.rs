//! Single-file download over plain HTTP.

use std::path::PathBuf;

use tokio::fs::File;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::DownloadError;
use crate::http::connection::Connection;
use crate::http::request::RequestInfo;
use crate::output::OutputOptions;
use crate::progress::ProgressSink;

/// Downloads URLs into files, one connection per download.
pub struct Downloader {
    cfg: Config,
    cancel: CancellationToken,
}

impl Downloader {
    pub fn new(cfg: Config, cancel: CancellationToken) -> Self {
        Self { cfg, cancel }
    }

    /// Downloads `url` and returns the path written.
    ///
    /// Only `http` URLs are accepted. A non-200 status is returned as
    /// [`DownloadError::HttpStatus`]; for redirects the `Location` header is
    /// attached but not followed. A failed download leaves the partially
    /// written file in place.
    pub async fn download(
        &self,
        url: &str,
        output: &OutputOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<PathBuf, DownloadError> {
        let info = RequestInfo::parse(url)?;

        if info.protocol.as_deref() != Some("http") {
            return Err(DownloadError::UnsupportedProtocol {
                protocol: info.protocol,
            });
        }

        tracing::debug!(
            host = %info.host,
            port = info.port,
            path = %info.path,
            "Starting download"
        );

        let mut conn = Connection::connect(&info.host, info.port, &self.cfg, self.cancel.clone()).await?;
        conn.send_request(&info.get_request(&self.cfg.user_agent)).await?;

        let status = conn.read_status_line().await?;

        if status.is_success() {
            let path = output.resolve(&info.file_name)?;
            let mut file = File::create(&path)
                .await
                .map_err(|source| DownloadError::Output {
                    path: path.clone(),
                    source,
                })?;

            let written = conn.download(&mut file, progress).await?;

            tracing::info!(
                path = %path.display(),
                bytes = written,
                "Download complete"
            );
            return Ok(path);
        }

        let location = if status.is_redirect() {
            let headers = conn.read_headers().await?;
            headers.get("location").map(str::to_string)
        } else {
            None
        };

        tracing::warn!(
            code = status.status_code,
            text = %status.status_text,
            location = ?location,
            "Unsuccessful request"
        );

        Err(DownloadError::HttpStatus {
            code: status.status_code,
            text: status.status_text,
            location,
        })
    }
}
