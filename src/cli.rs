//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Download a file from a URL and keep a history of every attempt.
///
/// Files are named from the server's Content-Disposition header, the URL
/// path, or the file's own signature bytes.
#[derive(Parser, Debug)]
#[command(name = "file-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// History database path (overrides `db_path` in the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a URL
    Get(GetArgs),
    /// Show the download history, newest first
    History(HistoryArgs),
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GetArgs {
    /// URL to download
    pub url: String,

    /// Save to this exact path
    #[arg(short, long, value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Save under this directory using the suggested filename
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct HistoryArgs {
    /// Print records as JSON
    #[arg(long)]
    pub json: bool,

    /// Mark rows whose file no longer exists
    #[arg(long)]
    pub check: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}
