//! Error types for the download module.
//!
//! Every failure that reaches the top of a download attempt is one of these
//! variants. [`DownloadError::kind`] folds them into the three categories the
//! presentation layer distinguishes.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::history::HistoryError;

/// Errors that can occur during a download attempt.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// No URL was supplied.
    #[error("no URL provided")]
    EmptyUrl,

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing the download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The download ledger could not be written.
    #[error("failed to record download: {0}")]
    History(#[from] HistoryError),

    /// Any other failure during the pipeline.
    #[error("{0}")]
    Other(String),
}

/// Coarse failure category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection failure, timeout, bad URL, or non-2xx status.
    Network,
    /// Writing the destination file failed.
    Io,
    /// Anything else.
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network",
            Self::Io => "io",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

impl DownloadError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the failure category used for user-facing reporting.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl { .. }
            | Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. } => FailureKind::Network,
            Self::Io { .. } => FailureKind::Io,
            Self::EmptyUrl | Self::History(_) | Self::Other(_) => FailureKind::Unknown,
        }
    }

    /// Renders the message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyUrl => "Please enter a URL.".to_string(),
            _ if self.kind() == FailureKind::Network => format!("Network error: {self}"),
            _ => format!("Download error: {self}"),
        }
    }
}

// No `From<reqwest::Error>` or `From<std::io::Error>`: both variants need a
// url or path that the source error does not carry.
