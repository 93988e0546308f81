//! History command handler: list the download ledger.

use std::path::Path;

use anyhow::{Context, Result};
use file_downloader::{Database, DownloadRecord, DownloadStatus, History};

use crate::cli::HistoryArgs;

const DATE_WIDTH: usize = 19;
const STATUS_WIDTH: usize = 9;
const MISSING_MARKER: &str = "(file not found)";

pub async fn run_history_command(args: &HistoryArgs, db_path: &Path) -> Result<()> {
    let db = Database::new(db_path)
        .await
        .with_context(|| format!("Failed to open history database '{}'", db_path.display()))?;
    let records = History::new(db)
        .list_all()
        .await
        .context("Failed to read download history")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No download history found in {}.", db_path.display());
        return Ok(());
    }

    println!(
        "{:<DATE_WIDTH$}  {:<STATUS_WIDTH$}  FILENAME",
        "DATE", "STATUS"
    );
    for record in &records {
        println!("{}", render_history_row(record, args.check));
    }

    Ok(())
}

fn render_history_row(record: &DownloadRecord, check: bool) -> String {
    let mut row = format!(
        "{:<DATE_WIDTH$}  {:<STATUS_WIDTH$}  {}",
        record.timestamp_text(),
        record.status.as_str(),
        record.filename
    );
    if check && is_missing(record) {
        row.push_str("  ");
        row.push_str(MISSING_MARKER);
    }
    row
}

/// A completed row whose file is gone. Failed rows may name a URL, so they are never checked.
fn is_missing(record: &DownloadRecord) -> bool {
    record.status == DownloadStatus::Completed && !Path::new(&record.filename).exists()
}
