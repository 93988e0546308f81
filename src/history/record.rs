//! Typed ledger rows.

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use sqlx::FromRow;
use tracing::warn;

use super::HistoryError;

/// Text format of the `download_date` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Terminal outcome of a download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// The file was written in full.
    Completed,
    /// The attempt ended with an error.
    Failed,
}

impl DownloadStatus {
    /// Returns the storage representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DownloadStatus {
    type Err = String;

    /// Accepts the current labels and the Korean labels written by the
    /// original desktop downloader (`완료`, `실패`).
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "completed" | "완료" => Ok(Self::Completed),
            "failed" | "실패" => Ok(Self::Failed),
            _ => Err(format!("invalid download status: {value}")),
        }
    }
}

/// One completed or failed download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRecord {
    /// Requested URL.
    pub url: String,
    /// Saved path, resolved filename, or the URL when no name was resolved.
    pub filename: String,
    /// When the attempt reached its terminal state (local time, whole seconds).
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Terminal outcome.
    pub status: DownloadStatus,
}

impl DownloadRecord {
    /// Builds a record stamped with the current local time.
    #[must_use]
    pub fn new(url: impl Into<String>, filename: impl Into<String>, status: DownloadStatus) -> Self {
        let now = Local::now().naive_local();
        Self {
            url: url.into(),
            filename: filename.into(),
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            status,
        }
    }

    /// Builds a [`DownloadStatus::Completed`] record stamped now.
    #[must_use]
    pub fn completed(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::new(url, filename, DownloadStatus::Completed)
    }

    /// Builds a [`DownloadStatus::Failed`] record stamped now.
    #[must_use]
    pub fn failed(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::new(url, filename, DownloadStatus::Failed)
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Raw `downloads` row as stored; columns are nullable in legacy files.
#[derive(Debug, FromRow)]
pub(crate) struct LedgerRow {
    pub url: Option<String>,
    pub filename: Option<String>,
    pub download_date: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<LedgerRow> for DownloadRecord {
    type Error = HistoryError;

    fn try_from(row: LedgerRow) -> std::result::Result<Self, Self::Error> {
        let url = row.url.unwrap_or_default();
        let date_text = row.download_date.unwrap_or_default();
        let timestamp = NaiveDateTime::parse_from_str(&date_text, TIMESTAMP_FORMAT)
            .map_err(|e| HistoryError::corrupt_row(&url, format!("bad download_date '{date_text}': {e}")))?;
        let status_text = row.status.unwrap_or_default();
        let status = status_text.parse().unwrap_or_else(|e| {
            warn!(url = %url, error = %e, "unknown ledger status; treating as failed");
            DownloadStatus::Failed
        });

        Ok(Self {
            url,
            filename: row.filename.unwrap_or_default(),
            timestamp,
            status,
        })
    }
}
