//! Terminal progress bar for a single download.

use std::time::Duration;

use file_downloader::ProgressObserver;
use indicatif::{ProgressBar, ProgressStyle};

/// Draws an `indicatif` bar (or a byte-counting spinner when the size is unknown).
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressObserver for BarProgress {
    fn on_start(&self, total: Option<u64>) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        match total {
            Some(len) => {
                self.bar.set_length(len);
                self.bar.set_style(
                    ProgressStyle::with_template(
                        "{spinner} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
                );
            }
            None => {
                self.bar.set_style(
                    ProgressStyle::with_template("{spinner} {bytes} ({bytes_per_sec})")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
            }
        }
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_bytes(&self, len: u64) {
        self.bar.inc(len);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}
