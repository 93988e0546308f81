//! Download engine: one URL in, one saved file and one ledger row out.
//!
//! The engine selects a [`FetchStrategy`](super::strategy::FetchStrategy) for
//! the URL, runs it, and records the attempt in the download [`History`].
//!
//! Every attempt that gets past URL validation ends in exactly one of:
//! - a `completed` row and a file at the chosen path
//! - a `failed` row and an error returned to the caller
//! - cancellation by the chooser, with nothing written and nothing recorded
//!
//! # Example
//!
//! ```no_run
//! use file_downloader::download::{DirectoryChooser, DownloadEngine, DownloadOutcome, HttpClient};
//! use file_downloader::{Database, History};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(Path::new("downloads.db")).await?;
//! let engine = DownloadEngine::new(HttpClient::new(), History::new(db));
//! let chooser = DirectoryChooser::new("./downloads");
//! if let DownloadOutcome::Completed(record) =
//!     engine.download("https://example.com/report.pdf", &chooser).await?
//! {
//!     println!("saved {}", record.filename);
//! }
//! # Ok(())
//! # }
//! ```

use tracing::{error, info, instrument, warn};

use super::client::HttpClient;
use super::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use super::destination::DestinationChooser;
use super::error::DownloadError;
use super::progress::{NoProgress, ProgressObserver};
use super::strategy::{FetchContext, FetchResult, FetchStrategy, StrategyRegistry};
use crate::history::{DownloadRecord, History};

/// How a download attempt ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File saved; this is the row appended to the ledger.
    Completed(DownloadRecord),
    /// The chooser declined to pick a path.
    Cancelled,
}

/// Runs single downloads and records them in the ledger.
#[derive(Debug)]
pub struct DownloadEngine {
    client: HttpClient,
    history: History,
    strategies: StrategyRegistry,
}

impl DownloadEngine {
    /// Creates an engine with the standard strategies and default chunk size.
    #[must_use]
    pub fn new(client: HttpClient, history: History) -> Self {
        Self {
            client,
            history,
            strategies: StrategyRegistry::with_defaults(DEFAULT_CHUNK_SIZE),
        }
    }

    /// Rebuilds the standard strategies with a different write buffer size.
    ///
    /// The size is clamped to the supported range.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        let clamped = chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
        if clamped != chunk_size {
            warn!(
                requested = chunk_size,
                used = clamped,
                "chunk size out of range; clamped"
            );
        }
        self.strategies = StrategyRegistry::with_defaults(clamped);
        self
    }

    /// Replaces the strategy registry.
    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategyRegistry) -> Self {
        self.strategies = strategies;
        self
    }

    /// The ledger this engine appends to.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the strategy that would handle `url`.
    #[must_use]
    pub fn strategy_for(&self, url: &str) -> Option<&dyn FetchStrategy> {
        self.strategies.select(url.trim())
    }

    /// Downloads `url` to the path picked by `chooser`, without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`DownloadEngine::download_with_progress`].
    pub async fn download(
        &self,
        url: &str,
        chooser: &(dyn DestinationChooser + Sync),
    ) -> Result<DownloadOutcome, DownloadError> {
        self.download_with_progress(url, chooser, &NoProgress).await
    }

    /// Downloads `url` to the path picked by `chooser`, reporting body transfer
    /// progress to `progress`.
    ///
    /// # Errors
    ///
    /// - `DownloadError::EmptyUrl` if `url` is blank; nothing is recorded.
    /// - Any fetch or write failure, after a `failed` row has been appended.
    /// - `DownloadError::History` if the ledger row could not be written. When
    ///   this happens while recording a failure, the original error is logged.
    #[instrument(skip(self, chooser, progress), fields(url = %url.trim()))]
    pub async fn download_with_progress(
        &self,
        url: &str,
        chooser: &(dyn DestinationChooser + Sync),
        progress: &dyn ProgressObserver,
    ) -> Result<DownloadOutcome, DownloadError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DownloadError::EmptyUrl);
        }

        info!("download started");
        let mut filename: Option<String> = None;
        let result = self.fetch(url, chooser, progress, &mut filename).await;
        progress.on_finish();

        match result {
            Ok(FetchResult::Saved(path)) => {
                let record = DownloadRecord::completed(url, path.display().to_string());
                self.history.append(&record).await?;
                info!(path = %path.display(), "download completed");
                Ok(DownloadOutcome::Completed(record))
            }
            Ok(FetchResult::Cancelled) => {
                info!("download cancelled; no destination chosen");
                Ok(DownloadOutcome::Cancelled)
            }
            Err(err) => {
                error!(kind = %err.kind(), error = %err, "download failed");
                let record =
                    DownloadRecord::failed(url, filename.unwrap_or_else(|| url.to_string()));
                if let Err(history_err) = self.history.append(&record).await {
                    error!(
                        error = %history_err,
                        original = %err,
                        "could not record failed download"
                    );
                    return Err(history_err.into());
                }
                Err(err)
            }
        }
    }

    async fn fetch(
        &self,
        url: &str,
        chooser: &(dyn DestinationChooser + Sync),
        progress: &dyn ProgressObserver,
        filename: &mut Option<String>,
    ) -> Result<FetchResult, DownloadError> {
        let strategy = self
            .strategies
            .select(url)
            .ok_or_else(|| DownloadError::Other(format!("no fetch strategy accepts {url}")))?;
        info!(strategy = strategy.name(), "fetch strategy selected");

        let ctx = FetchContext {
            client: &self.client,
            url,
            chooser,
            progress,
        };
        strategy.fetch(&ctx, filename).await
    }
}
