//! Get command handler: download one URL.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use file_downloader::download::{NoProgress, ProgressObserver};
use file_downloader::{
    Database, DestinationChooser, DirectoryChooser, DownloadEngine, DownloadOutcome,
    FixedPathChooser, History, HttpClient, SaveSuggestion,
};
use tracing::{debug, warn};

use crate::app_config::FileConfig;
use crate::cli::GetArgs;
use crate::progress_ui::BarProgress;

/// Asks on the terminal where to save, offering the suggested name.
///
/// An empty answer accepts the suggestion, `-` (or end of input) cancels.
struct PromptChooser;

impl DestinationChooser for PromptChooser {
    fn choose(&self, suggestion: &SaveSuggestion) -> Option<PathBuf> {
        // Reading stdin blocks; hand this worker's other tasks to the runtime meanwhile.
        tokio::task::block_in_place(|| {
            prompt_for_path(io::stdin().lock(), io::stderr(), &suggestion.filename)
        })
    }
}

/// Writes the prompt to `output` and reads one answer line from `input`.
///
/// An unwritable prompt or unreadable answer is treated as a cancel.
fn prompt_for_path<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    suggested: &str,
) -> Option<PathBuf> {
    if let Err(e) = write!(output, "Save as [{suggested}]: ").and_then(|()| output.flush()) {
        warn!(error = %e, "could not show save prompt; cancelling");
        return None;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) => None,
        Ok(_) => parse_prompt_answer(&answer, suggested),
        Err(e) => {
            warn!(error = %e, "could not read save path; cancelling");
            None
        }
    }
}

fn parse_prompt_answer(answer: &str, suggested: &str) -> Option<PathBuf> {
    match answer.trim() {
        "-" => None,
        "" if suggested.is_empty() => None,
        "" => Some(PathBuf::from(suggested)),
        path => Some(PathBuf::from(path)),
    }
}

fn build_chooser(args: &GetArgs, config: &FileConfig) -> Box<dyn DestinationChooser + Sync> {
    if let Some(path) = &args.output {
        return Box::new(FixedPathChooser::new(path.clone()));
    }
    match args.output_dir.as_ref().or(config.output_dir.as_ref()) {
        Some(dir) => Box::new(DirectoryChooser::new(dir.clone())),
        None => Box::new(PromptChooser),
    }
}

pub async fn run_get_command(args: &GetArgs, config: &FileConfig, db_path: &Path) -> Result<ExitCode> {
    let db = Database::new(db_path)
        .await
        .with_context(|| format!("Failed to open history database '{}'", db_path.display()))?;
    let client = HttpClient::new_with_timeouts(
        config.effective_connect_timeout_secs(),
        config.effective_read_timeout_secs(),
    );
    let engine =
        DownloadEngine::new(client, History::new(db)).with_chunk_size(config.effective_chunk_size());

    let chooser = build_chooser(args, config);
    let bar;
    let progress: &dyn ProgressObserver = if args.no_progress {
        &NoProgress
    } else {
        bar = BarProgress::new();
        &bar
    };

    debug!(url = %args.url, "starting download");
    match engine
        .download_with_progress(&args.url, chooser.as_ref(), progress)
        .await
    {
        Ok(DownloadOutcome::Completed(record)) => {
            println!("Download complete: {}", record.filename);
            Ok(ExitCode::SUCCESS)
        }
        Ok(DownloadOutcome::Cancelled) => {
            println!("Download cancelled");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
