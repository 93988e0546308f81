//! Download history ledger.
//!
//! The ledger is a single `downloads` table holding one row per terminal
//! download attempt. The pipeline only ever appends; readers always get the
//! full table, newest first.
//!
//! # Example
//!
//! ```ignore
//! use file_downloader::{Database, DownloadRecord, History};
//! use std::path::Path;
//!
//! let db = Database::new(Path::new("downloads.db")).await?;
//! let history = History::new(db);
//! history.append(&DownloadRecord::completed("https://example.com/a.pdf", "/tmp/a.pdf")).await?;
//! for record in history.list_all().await? {
//!     println!("{} {} {}", record.timestamp_text(), record.filename, record.status);
//! }
//! ```

mod error;
mod record;

pub use error::{DbErrorKind, HistoryError};
pub use record::{DownloadRecord, DownloadStatus, TIMESTAMP_FORMAT};

use record::LedgerRow;
use tracing::{debug, instrument, warn};

use crate::db::Database;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Append-only ledger of download attempts.
#[derive(Debug, Clone)]
pub struct History {
    db: Database,
}

impl History {
    /// Creates a ledger over the given database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Durably persists one record.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Database`] if the insert fails.
    #[instrument(skip(self, record), fields(url = %record.url, status = %record.status))]
    pub async fn append(&self, record: &DownloadRecord) -> Result<()> {
        sqlx::query(
            r"INSERT INTO downloads (url, filename, download_date, status)
              VALUES (?, ?, ?, ?)",
        )
        .bind(&record.url)
        .bind(&record.filename)
        .bind(record.timestamp_text())
        .bind(record.status.as_str())
        .execute(self.db.pool())
        .await?;

        debug!(filename = %record.filename, "ledger row appended");
        Ok(())
    }

    /// Returns every readable record, newest first.
    ///
    /// Rows sharing a timestamp come back newest insert first. Rows whose
    /// `download_date` is missing or unparseable are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<DownloadRecord>> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r"SELECT url, filename, download_date, status
              FROM downloads
              ORDER BY download_date DESC, rowid DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match DownloadRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable ledger row");
                    None
                }
            })
            .collect())
    }

    /// Returns the underlying database handle.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }
}
