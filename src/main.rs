//! CLI entry point for the file downloader.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

mod app_config;
mod cli;
mod commands;
mod progress_ui;

use app_config::{VerbositySetting, load_default_file_config};
use cli::{Args, Command, ConfigCommand};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded_config = load_default_file_config()?;
    let config = &loaded_config.config;

    init_tracing(
        default_log_level(&args, config.verbosity),
        config.log_file.as_deref(),
    )?;

    debug!(?args, "CLI arguments parsed");
    debug!(
        path = ?loaded_config.path,
        loaded = loaded_config.loaded_from_file,
        "configuration resolved"
    );

    let db_path = args.db.clone().unwrap_or_else(|| config.effective_db_path());

    match &args.command {
        Command::Get(get_args) => {
            info!("File downloader starting");
            commands::run_get_command(get_args, config, &db_path).await
        }
        Command::History(history_args) => {
            commands::run_history_command(history_args, &db_path).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(ConfigCommand::Show) => {
            commands::run_config_show_command(
                &loaded_config,
                &db_path,
                verbosity_label(&args, config.verbosity),
            )?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Determines the log level from the verbose/quiet flags and config.
///
/// Priority: quiet flag > verbose flag > config verbosity > default (info).
/// `RUST_LOG`, when set, replaces the result entirely.
fn default_log_level(args: &Args, configured: Option<VerbositySetting>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => match configured {
            Some(VerbositySetting::Quiet) => "error",
            Some(VerbositySetting::Verbose) => "debug",
            Some(VerbositySetting::Debug) => "trace",
            Some(VerbositySetting::Default) | None => "info",
        },
        1 => "debug",
        _ => "trace",
    }
}

fn verbosity_label(args: &Args, configured: Option<VerbositySetting>) -> &'static str {
    match default_log_level(args, configured) {
        "error" => VerbositySetting::Quiet.as_str(),
        "debug" => VerbositySetting::Verbose.as_str(),
        "trace" => VerbositySetting::Debug.as_str(),
        _ => VerbositySetting::Default.as_str(),
    }
}

/// Console logs go to stderr; `log_file` additionally receives plain-text lines.
fn init_tracing(default_level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}
