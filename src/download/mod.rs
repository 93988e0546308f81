//! HTTP download pipeline: fetch a URL, name the file, save it, record it.
//!
//! This module provides functionality for downloading a single file from an
//! HTTP/HTTPS URL to a caller-chosen path.
//!
//! # Features
//!
//! - Two fetch strategies: bulk (dataset API, whole body in memory) and
//!   streaming (bounded chunks to disk)
//! - Filename resolution from Content-Disposition, the URL path, or a
//!   timestamped fallback
//! - File-type detection from the leading magic bytes
//! - Pluggable destination choice; returning no path cancels cleanly
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Every completed or failed attempt appended to the history ledger
//!
//! # Example
//!
//! ```no_run
//! use file_downloader::download::{DownloadEngine, FixedPathChooser, HttpClient};
//! use file_downloader::{Database, History};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let history = History::new(Database::new(Path::new("downloads.db")).await?);
//! let engine = DownloadEngine::new(HttpClient::new(), history);
//! engine
//!     .download("https://example.com/logo", &FixedPathChooser::new("logo"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod destination;
mod engine;
mod error;
pub mod filename;
mod progress;
pub mod signature;
mod strategy;

pub use client::HttpClient;
pub use destination::{
    DestinationChooser, DirectoryChooser, FALLBACK_SAVE_NAME, FixedPathChooser, SaveSuggestion,
    apply_default_extension,
};
pub use engine::{DownloadEngine, DownloadOutcome};
pub use error::{DownloadError, FailureKind};
pub use progress::{NoProgress, ProgressObserver};
pub use strategy::{
    BulkStrategy, FetchContext, FetchResult, FetchStrategy, StrategyKind, StrategyPriority,
    StrategyRegistry, StreamingStrategy,
};

// Note: we do NOT define module-local Result aliases here.
// Use `Result<T, DownloadError>` explicitly in function signatures.
