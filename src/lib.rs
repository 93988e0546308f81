//! File Downloader Core Library
//!
//! Downloads a single file from a URL to a chosen location and keeps a
//! persistent ledger of every attempt.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`db`] - SQLite connection and schema management
//! - [`download`] - Fetch strategies, filename resolution, signature
//!   detection, and the download engine
//! - [`history`] - Append-only ledger of download attempts

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod db;
pub mod download;
pub mod history;
mod user_agent;

// Re-export commonly used types
pub use db::{Database, DbError};
pub use download::{
    DestinationChooser, DirectoryChooser, DownloadEngine, DownloadError, DownloadOutcome,
    FailureKind, FixedPathChooser, HttpClient, ProgressObserver, SaveSuggestion,
};
pub use history::{DownloadRecord, DownloadStatus, History, HistoryError};
pub use user_agent::BULK_BROWSER_USER_AGENT;
