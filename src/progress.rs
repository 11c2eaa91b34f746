//! Progress reporting for a single download.

use indicatif::{ProgressBar, ProgressStyle};

use crate::cancel::CancellationToken;

/// Receives progress notifications while a body is downloaded.
///
/// The engine calls `start` before the first body byte, `set_total` once
/// (0 when the size is unknown), `add_progress` after every write with the
/// exact byte count, and `stop` when decoding ends, successfully or not.
pub trait ProgressSink {
    fn start(&mut self);
    fn stop(&mut self);
    fn set_total(&mut self, bytes: u64);
    fn add_progress(&mut self, bytes: u64);

    /// Polled before every body receive.
    fn is_canceled(&self) -> bool {
        false
    }
}

/// Discards all progress notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn set_total(&mut self, _bytes: u64) {}
    fn add_progress(&mut self, _bytes: u64) {}
}

const BAR_TEMPLATE: &str = "{bytes:>10} / {total_bytes:>10} {percent:>3}% [{bar:30}] {bytes_per_sec}";
const SPINNER_TEMPLATE: &str = "{spinner} {bytes:>10} / {msg:>10} {bytes_per_sec}";

/// Terminal progress meter.
///
/// Shows a bar when the total is known and a byte counter otherwise. Reports
/// the state of the shared cancellation token.
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    cancel: CancellationToken,
}

impl ConsoleProgress {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { bar: None, cancel }
    }
}

impl ProgressSink for ConsoleProgress {
    fn start(&mut self) {
        if self.bar.is_none() {
            self.bar = Some(ProgressBar::new_spinner());
        }
    }

    fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }

    fn set_total(&mut self, bytes: u64) {
        let Some(bar) = &self.bar else {
            return;
        };

        if bytes == 0 {
            bar.set_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message("-");
        } else {
            bar.set_length(bytes);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
        }
    }

    fn add_progress(&mut self, bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(bytes);
        }
    }

    fn is_canceled(&self) -> bool {
        self.cancel.is_canceled()
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.stop();
    }
}
